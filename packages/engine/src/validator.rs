//! Instance validation
//!
//! Walks the spanned instance tree against a compiled schema and collects
//! markers. Holes left by the parser are skipped: the parse marker already
//! covers them, and validating a value the user has not typed yet would only
//! produce noise.

use crate::node::{push_pointer, Member, Node, NodeValue};
use crate::schema::{Additional, CompiledSchema};
use schemapad_common::Marker;

pub fn validate(root: &Node, schema: &CompiledSchema) -> Vec<Marker> {
    let mut markers = Vec::new();
    check(root, schema, "", &mut markers);
    markers
}

/// Whether a node satisfies a schema, ignoring warnings. Used for `anyOf`.
fn is_valid(node: &Node, schema: &CompiledSchema) -> bool {
    let mut markers = Vec::new();
    check(node, schema, "", &mut markers);
    markers
        .iter()
        .all(|m| m.severity != schemapad_common::Severity::Error)
}

fn check(node: &Node, schema: &CompiledSchema, pointer: &str, out: &mut Vec<Marker>) {
    if node.is_missing() {
        return;
    }

    if schema.never {
        out.push(Marker::error(
            pointer,
            "No value is allowed here",
            node.span,
        ));
        return;
    }

    if schema.deprecated {
        out.push(Marker::warning(pointer, "Deprecated", node.span));
    }

    if let Some(types) = &schema.types {
        if !types.iter().any(|t| t.matches(&node.value)) {
            let expected: Vec<&str> = types.iter().map(|t| t.name()).collect();
            out.push(Marker::error(
                pointer,
                format!("Expected {}, found {}", expected.join(" or "), node.kind()),
                node.span,
            ));
        }
    }

    if let Some(expected) = &schema.const_value {
        if &node.to_json() != expected {
            out.push(Marker::error(
                pointer,
                format!("Expected the constant value {}", expected),
                node.span,
            ));
        }
    }

    if let Some(allowed) = &schema.enum_values {
        let actual = node.to_json();
        if !allowed.contains(&actual) {
            out.push(Marker::error(
                pointer,
                "Value is not one of the allowed values",
                node.span,
            ));
        }
    }

    match &node.value {
        NodeValue::String(s) => check_string(node, s, schema, pointer, out),
        NodeValue::Number(n) => check_number(node, *n, schema, pointer, out),
        NodeValue::Array(items) => check_array(node, items, schema, pointer, out),
        NodeValue::Object(members) => check_object(node, members, schema, pointer, out),
        _ => {}
    }

    for sub in &schema.all_of {
        check(node, sub, pointer, out);
    }

    if !schema.any_of.is_empty() && !schema.any_of.iter().any(|sub| is_valid(node, sub)) {
        out.push(Marker::error(
            pointer,
            "Value does not match any of the allowed variants",
            node.span,
        ));
    }
}

fn check_string(
    node: &Node,
    value: &str,
    schema: &CompiledSchema,
    pointer: &str,
    out: &mut Vec<Marker>,
) {
    let length = value.chars().count();
    if let Some(min) = schema.min_length {
        if length < min {
            out.push(Marker::error(
                pointer,
                format!("String is shorter than {} characters", min),
                node.span,
            ));
        }
    }
    if let Some(max) = schema.max_length {
        if length > max {
            out.push(Marker::error(
                pointer,
                format!("String is longer than {} characters", max),
                node.span,
            ));
        }
    }
    if let Some((source, regex)) = &schema.pattern {
        if !regex.is_match(value) {
            out.push(Marker::error(
                pointer,
                format!("String does not match pattern \"{}\"", source),
                node.span,
            ));
        }
    }
}

fn check_number(
    node: &Node,
    value: f64,
    schema: &CompiledSchema,
    pointer: &str,
    out: &mut Vec<Marker>,
) {
    if let Some(min) = schema.minimum {
        if value < min {
            out.push(Marker::error(
                pointer,
                format!("Value is below the minimum of {}", min),
                node.span,
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if value > max {
            out.push(Marker::error(
                pointer,
                format!("Value is above the maximum of {}", max),
                node.span,
            ));
        }
    }
    if let Some(min) = schema.exclusive_minimum {
        if value <= min {
            out.push(Marker::error(
                pointer,
                format!("Value must be greater than {}", min),
                node.span,
            ));
        }
    }
    if let Some(max) = schema.exclusive_maximum {
        if value >= max {
            out.push(Marker::error(
                pointer,
                format!("Value must be less than {}", max),
                node.span,
            ));
        }
    }
}

fn check_array(
    node: &Node,
    items: &[Node],
    schema: &CompiledSchema,
    pointer: &str,
    out: &mut Vec<Marker>,
) {
    if let Some(min) = schema.min_items {
        if items.len() < min {
            out.push(Marker::error(
                pointer,
                format!("Array has fewer than {} items", min),
                node.span,
            ));
        }
    }
    if let Some(max) = schema.max_items {
        if items.len() > max {
            out.push(Marker::error(
                pointer,
                format!("Array has more than {} items", max),
                node.span,
            ));
        }
    }
    if let Some(item_schema) = &schema.items {
        for (index, item) in items.iter().enumerate() {
            check(item, item_schema, &format!("{}/{}", pointer, index), out);
        }
    }
}

fn check_object(
    node: &Node,
    members: &[Member],
    schema: &CompiledSchema,
    pointer: &str,
    out: &mut Vec<Marker>,
) {
    for name in &schema.required {
        if !members.iter().any(|m| &m.key == name) {
            out.push(Marker::error(
                pointer,
                format!("Missing required property \"{}\"", name),
                node.span,
            ));
        }
    }

    for member in members {
        let member_pointer = push_pointer(pointer, &member.key);
        match schema.property(&member.key) {
            Some(sub) => check(&member.value, sub, &member_pointer, out),
            None => match &schema.additional {
                Additional::Allowed => {}
                Additional::Forbidden => {
                    out.push(Marker::error(
                        member_pointer.as_str(),
                        format!("Property \"{}\" is not allowed", member.key),
                        member.key_span,
                    ));
                }
                Additional::Schema(sub) => check(&member.value, sub, &member_pointer, out),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use schemapad_common::Severity;
    use serde_json::json;

    fn markers_for(text: &str, schema: serde_json::Value) -> Vec<Marker> {
        let root = parse(text).root.unwrap();
        validate(&root, &CompiledSchema::compile(&schema))
    }

    #[test]
    fn test_type_mismatch() {
        let markers = markers_for(r#"{"hello": "world"}"#, json!({"type": "boolean"}));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].message, "Expected boolean, found object");
        assert_eq!(markers[0].pointer, "");
    }

    #[test]
    fn test_matching_type_is_clean() {
        assert!(markers_for(r#"{"hello": "world"}"#, json!({"type": "object"})).is_empty());
        assert!(markers_for("3", json!({"type": "integer"})).is_empty());
        assert!(!markers_for("3.5", json!({"type": "integer"})).is_empty());
    }

    #[test]
    fn test_required_and_nested_properties() {
        let schema = json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
            "required": ["name", "age"]
        });
        let markers = markers_for(r#"{"name": 4}"#, schema);

        assert!(markers
            .iter()
            .any(|m| m.message.contains("required property \"age\"")));
        assert!(markers
            .iter()
            .any(|m| m.pointer == "/name" && m.message.contains("Expected string")));
    }

    #[test]
    fn test_additional_properties_forbidden_marks_key() {
        let text = r#"{"known": 1, "extra": 2}"#;
        let schema = json!({
            "properties": {"known": {}},
            "additionalProperties": false
        });
        let markers = markers_for(text, schema);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].pointer, "/extra");
        // The marker sits on the key, not the value
        assert_eq!(markers[0].span.start, text.find("\"extra\"").unwrap());
    }

    #[test]
    fn test_enum_const_and_bounds() {
        assert!(markers_for(r#""red""#, json!({"enum": ["red", "green"]})).is_empty());
        assert!(!markers_for(r#""blue""#, json!({"enum": ["red", "green"]})).is_empty());
        assert!(!markers_for("2", json!({"const": 3})).is_empty());
        assert!(!markers_for("2", json!({"minimum": 5})).is_empty());
        assert!(!markers_for("5", json!({"exclusiveMaximum": 5})).is_empty());
        assert!(markers_for("4.9", json!({"exclusiveMaximum": 5})).is_empty());
    }

    #[test]
    fn test_string_checks() {
        assert!(!markers_for(r#""ab""#, json!({"minLength": 3})).is_empty());
        assert!(!markers_for(r#""abcd""#, json!({"maxLength": 3})).is_empty());
        assert!(markers_for(r#""f.o""#, json!({"pattern": "^f"})).is_empty());
        assert!(!markers_for(r#""oof""#, json!({"pattern": "^f"})).is_empty());
    }

    #[test]
    fn test_array_items() {
        let schema = json!({"items": {"type": "integer"}, "maxItems": 2});
        let markers = markers_for(r#"[1, "x", 3]"#, schema);
        assert!(markers.iter().any(|m| m.pointer == "/1"));
        assert!(markers.iter().any(|m| m.message.contains("more than 2")));
    }

    #[test]
    fn test_all_of_combines() {
        let schema = json!({
            "allOf": [
                {"properties": {"foo": {"type": "string"}}, "required": ["foo"]},
                {"properties": {"baz": {"type": "null"}}, "required": ["baz"]}
            ]
        });
        let markers = markers_for(r#"{"foo": "ok"}"#, schema);
        assert_eq!(markers.len(), 1);
        assert!(markers[0].message.contains("\"baz\""));
    }

    #[test]
    fn test_any_of_accepts_one_branch() {
        let schema = json!({"anyOf": [{"type": "string"}, {"type": "integer"}]});
        assert!(markers_for("3", schema.clone()).is_empty());
        let markers = markers_for("true", schema);
        assert_eq!(markers.len(), 1);
        assert!(markers[0].message.contains("any of the allowed variants"));
    }

    #[test]
    fn test_deprecated_is_warning() {
        let markers = markers_for("1", json!({"deprecated": true, "type": "integer"}));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].severity, Severity::Warning);
    }

    #[test]
    fn test_holes_are_skipped() {
        let root = parse(r#"{"foo": }"#).root.unwrap();
        let schema = CompiledSchema::compile(&json!({
            "properties": {"foo": {"type": "integer"}}
        }));
        assert!(validate(&root, &schema).is_empty());
    }
}
