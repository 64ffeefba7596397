//! Compiled schema dialect
//!
//! A practical JSON Schema subset, compiled from a plain JSON value into a
//! validator-friendly form. Compilation is degenerate-tolerant: keyword
//! shapes the dialect cannot use are ignored rather than rejected, so the
//! session can always feed an instance revalidation with *some* schema, even
//! while the schema document is half-typed. Unknown keywords are ignored, as
//! JSON Schema allows.

use crate::node::NodeValue;
use regex::Regex;
use serde_json::{Map, Value};

/// The `type` keyword's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    Integer,
    String,
}

impl JsonType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
        }
    }

    pub fn matches(&self, value: &NodeValue) -> bool {
        match (self, value) {
            (Self::Null, NodeValue::Null) => true,
            (Self::Boolean, NodeValue::Bool(_)) => true,
            (Self::Object, NodeValue::Object(_)) => true,
            (Self::Array, NodeValue::Array(_)) => true,
            (Self::Number, NodeValue::Number(_)) => true,
            (Self::Integer, NodeValue::Number(n)) => n.fract() == 0.0,
            (Self::String, NodeValue::String(_)) => true,
            _ => false,
        }
    }

    /// Canonical example value for completion candidates
    pub fn example(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean => Value::Bool(false),
            Self::Object => Value::Object(Map::new()),
            Self::Array => Value::Array(vec![]),
            Self::Number | Self::Integer => serde_json::json!(0),
            Self::String => Value::String(String::new()),
        }
    }
}

/// The `additionalProperties` keyword
#[derive(Debug, Clone, Default)]
pub enum Additional {
    #[default]
    Allowed,
    Forbidden,
    Schema(Box<CompiledSchema>),
}

#[derive(Debug, Clone, Default)]
pub struct CompiledSchema {
    /// `false` schema: rejects everything
    pub never: bool,

    pub types: Option<Vec<JsonType>>,
    pub enum_values: Option<Vec<Value>>,
    pub const_value: Option<Value>,

    /// Source order is preserved; candidate ordering depends on it
    pub properties: Vec<(String, CompiledSchema)>,
    pub required: Vec<String>,
    pub additional: Additional,

    pub items: Option<Box<CompiledSchema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,

    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<(String, Regex)>,

    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,

    pub all_of: Vec<CompiledSchema>,
    pub any_of: Vec<CompiledSchema>,

    pub deprecated: bool,

    // Annotations
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<Value>,
    pub default_value: Option<Value>,
}

impl CompiledSchema {
    /// Permissive schema: accepts everything, suggests nothing
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn compile(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::default(),
            Value::Bool(false) => Self {
                never: true,
                ..Self::default()
            },
            Value::Object(map) => Self::compile_object(map),
            // Anything else is a degenerate schema; treat as permissive
            _ => Self::default(),
        }
    }

    fn compile_object(map: &Map<String, Value>) -> Self {
        let mut schema = Self::default();

        match map.get("type") {
            Some(Value::String(name)) => {
                if let Some(t) = JsonType::from_name(name) {
                    schema.types = Some(vec![t]);
                }
            }
            Some(Value::Array(names)) => {
                let types: Vec<JsonType> = names
                    .iter()
                    .filter_map(|n| n.as_str())
                    .filter_map(JsonType::from_name)
                    .collect();
                if !types.is_empty() {
                    schema.types = Some(types);
                }
            }
            _ => {}
        }

        if let Some(Value::Array(values)) = map.get("enum") {
            schema.enum_values = Some(values.clone());
        }
        if let Some(value) = map.get("const") {
            schema.const_value = Some(value.clone());
        }

        if let Some(Value::Object(properties)) = map.get("properties") {
            schema.properties = properties
                .iter()
                .map(|(name, sub)| (name.clone(), Self::compile(sub)))
                .collect();
        }
        if let Some(Value::Array(names)) = map.get("required") {
            schema.required = names
                .iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect();
        }
        match map.get("additionalProperties") {
            Some(Value::Bool(false)) => schema.additional = Additional::Forbidden,
            Some(Value::Bool(true)) | None => {}
            Some(other) if other.is_object() => {
                schema.additional = Additional::Schema(Box::new(Self::compile(other)));
            }
            Some(_) => {}
        }

        if let Some(items) = map.get("items") {
            if items.is_object() || items.is_boolean() {
                schema.items = Some(Box::new(Self::compile(items)));
            }
        }
        schema.min_items = map.get("minItems").and_then(Value::as_u64).map(|n| n as usize);
        schema.max_items = map.get("maxItems").and_then(Value::as_u64).map(|n| n as usize);

        schema.min_length = map.get("minLength").and_then(Value::as_u64).map(|n| n as usize);
        schema.max_length = map.get("maxLength").and_then(Value::as_u64).map(|n| n as usize);
        if let Some(Value::String(source)) = map.get("pattern") {
            // An unusable pattern is ignored, not fatal
            if let Ok(regex) = Regex::new(source) {
                schema.pattern = Some((source.clone(), regex));
            }
        }

        schema.minimum = map.get("minimum").and_then(Value::as_f64);
        schema.maximum = map.get("maximum").and_then(Value::as_f64);
        schema.exclusive_minimum = map.get("exclusiveMinimum").and_then(Value::as_f64);
        schema.exclusive_maximum = map.get("exclusiveMaximum").and_then(Value::as_f64);

        if let Some(Value::Array(subs)) = map.get("allOf") {
            schema.all_of = subs.iter().map(Self::compile).collect();
        }
        if let Some(Value::Array(subs)) = map.get("anyOf") {
            schema.any_of = subs.iter().map(Self::compile).collect();
        }

        schema.deprecated = map
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        schema.title = map.get("title").and_then(Value::as_str).map(str::to_string);
        schema.description = map
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(Value::Array(examples)) = map.get("examples") {
            schema.examples = examples.clone();
        }
        schema.default_value = map.get("default").cloned();

        schema
    }

    /// Subschema declared for a property, searching `allOf`/`anyOf` branches
    /// after the schema's own declarations.
    pub fn property(&self, name: &str) -> Option<&CompiledSchema> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
            .or_else(|| {
                self.all_of
                    .iter()
                    .chain(self.any_of.iter())
                    .find_map(|sub| sub.property(name))
            })
    }

    /// All property declarations visible at this schema, own first, then
    /// `allOf`/`anyOf` branches, preserving declaration order.
    pub fn visible_properties(&self) -> Vec<(&str, &CompiledSchema)> {
        let mut out: Vec<(&str, &CompiledSchema)> = Vec::new();
        self.collect_properties(&mut out);
        out
    }

    fn collect_properties<'a>(&'a self, out: &mut Vec<(&'a str, &'a CompiledSchema)>) {
        for (name, sub) in &self.properties {
            if !out.iter().any(|(n, _)| n == name) {
                out.push((name.as_str(), sub));
            }
        }
        for sub in self.all_of.iter().chain(self.any_of.iter()) {
            sub.collect_properties(out);
        }
    }

    /// Resolve the subschema at an instance-side JSON Pointer.
    pub fn resolve(&self, pointer: &str) -> Option<&CompiledSchema> {
        if pointer.is_empty() {
            return Some(self);
        }
        let mut current = self;
        for token in pointer.split('/').skip(1) {
            let token = crate::node::unescape_pointer_token(token);
            current = if token.chars().all(|c| c.is_ascii_digit()) {
                current
                    .items
                    .as_deref()
                    .or_else(|| current.property(&token))?
            } else {
                current.property(&token).or_else(|| {
                    match &current.additional {
                        Additional::Schema(sub) => Some(sub.as_ref()),
                        _ => None,
                    }
                })?
            };
        }
        Some(current)
    }
}

/// Built-in schema for schema documents: describes the dialect above so a
/// session can validate the schema editor's text without blocking
/// propagation.
pub fn meta_schema() -> Value {
    let type_names = serde_json::json!([
        "null", "boolean", "object", "array", "number", "integer", "string"
    ]);
    serde_json::json!({
        "title": "Schema dialect",
        "type": "object",
        "properties": {
            "type": {
                "anyOf": [
                    { "enum": type_names.clone() },
                    { "type": "array", "items": { "enum": type_names } }
                ]
            },
            "enum": { "type": "array", "minItems": 1 },
            "const": true,
            "properties": { "type": "object" },
            "required": { "type": "array", "items": { "type": "string" } },
            "additionalProperties": { "type": ["boolean", "object"] },
            "items": { "type": ["boolean", "object"] },
            "minItems": { "type": "integer", "minimum": 0 },
            "maxItems": { "type": "integer", "minimum": 0 },
            "minLength": { "type": "integer", "minimum": 0 },
            "maxLength": { "type": "integer", "minimum": 0 },
            "pattern": { "type": "string" },
            "minimum": { "type": "number" },
            "maximum": { "type": "number" },
            "exclusiveMinimum": { "type": "number" },
            "exclusiveMaximum": { "type": "number" },
            "allOf": { "type": "array", "items": { "type": ["boolean", "object"] } },
            "anyOf": { "type": "array", "items": { "type": ["boolean", "object"] } },
            "deprecated": { "type": "boolean" },
            "title": { "type": "string" },
            "description": { "type": "string" },
            "examples": { "type": "array" },
            "default": true
        }
    })
}
