//! Typed document snapshots
//!
//! A `TypedJson` is an immutable, cheaply-clonable snapshot of "this text,
//! interpreted against this schema (or none)". Every change produces a new
//! snapshot via `with_text`/`with_schema`; nothing is mutated in place, so a
//! session can hold "previous value" and "next value" side by side without
//! aliasing hazards.

use crate::node::Node;
use crate::parser::parse;
use crate::schema::CompiledSchema;
use crate::suggest;
use crate::validator::validate;
use schemapad_common::{
    DocumentEngine, EngineError, Marker, SuggestionGroup,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TypedJson {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    text: String,
    root: Option<Node>,
    /// Schema dependency this snapshot was validated against
    schema: Option<Arc<CompiledSchema>>,
    /// Parse markers followed by validation markers
    markers: Vec<Marker>,
    /// This snapshot's own value compiled as a schema, for use as another
    /// document's dependency
    as_schema: Arc<CompiledSchema>,
}

impl TypedJson {
    pub fn new(text: &str, schema: Option<Arc<CompiledSchema>>) -> Self {
        let outcome = parse(text);

        let mut markers = outcome.markers;
        if let (Some(root), Some(schema)) = (&outcome.root, &schema) {
            markers.extend(validate(root, schema));
        }

        let as_schema = Arc::new(match &outcome.root {
            Some(root) => CompiledSchema::compile(&root.to_json()),
            None => CompiledSchema::permissive(),
        });

        Self {
            inner: Arc::new(Inner {
                text: text.to_string(),
                root: outcome.root,
                schema,
                markers,
                as_schema,
            }),
        }
    }

    /// New snapshot for a new full text, keeping the schema dependency
    pub fn with_text(&self, text: &str) -> Self {
        Self::new(text, self.inner.schema.clone())
    }

    /// New snapshot validated against another document's value as schema
    pub fn with_schema(&self, schema: &TypedJson) -> Self {
        Self::new(&self.inner.text, Some(schema.compiled()))
    }

    pub fn text(&self) -> &str {
        &self.inner.text
    }

    pub fn root(&self) -> Option<&Node> {
        self.inner.root.as_ref()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.inner.markers.clone()
    }

    pub fn suggestions_at(&self, offset: usize) -> Vec<SuggestionGroup> {
        let schema = match &self.inner.schema {
            Some(schema) => schema.as_ref(),
            None => return vec![],
        };
        suggest::suggestions_at(self.inner.root.as_ref(), schema, offset)
    }

    /// This document's own value, compiled as a schema
    pub fn compiled(&self) -> Arc<CompiledSchema> {
        self.inner.as_schema.clone()
    }
}

/// The reference engine: in-process, synchronous, total
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEngine;

impl JsonEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentEngine for JsonEngine {
    type Value = TypedJson;

    fn derive_initial(&self, schema: Option<&TypedJson>) -> Result<TypedJson, EngineError> {
        Ok(TypedJson::new("", schema.map(TypedJson::compiled)))
    }

    fn derive_with_schema(
        &self,
        value: &TypedJson,
        schema: &TypedJson,
    ) -> Result<TypedJson, EngineError> {
        Ok(value.with_schema(schema))
    }

    fn derive_with_text(&self, value: &TypedJson, text: &str) -> Result<TypedJson, EngineError> {
        Ok(value.with_text(text))
    }

    fn markers_of(&self, value: &TypedJson) -> Vec<Marker> {
        value.markers()
    }

    fn suggestions_at(&self, value: &TypedJson, offset: usize) -> Vec<SuggestionGroup> {
        value.suggestions_at(offset)
    }

    fn meta_schema(&self) -> Option<TypedJson> {
        Some(TypedJson::new(meta_schema_text(), None))
    }
}

fn meta_schema_text() -> &'static str {
    static TEXT: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    TEXT.get_or_init(|| {
        serde_json::to_string_pretty(&crate::schema::meta_schema())
            .unwrap_or_else(|_| "{}".to_string())
    })
}
