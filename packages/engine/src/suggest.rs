//! Schema-aware completion candidates
//!
//! Locates the innermost node (or hole) containing the cursor, resolves the
//! subschema at its JSON Pointer, and emits candidates in schema order:
//! `const`, `enum` values, `examples`, `default`, then one canonical example
//! per allowed type. At object-key positions, absent property names are
//! offered instead. The engine reports all candidates; capping the list is
//! the projector's concern.

use crate::node::{locate, Location, Node, NodeValue};
use crate::schema::{CompiledSchema, JsonType};
use schemapad_common::{Span, Suggestion, SuggestionGroup};
use serde_json::{Map, Value};

pub fn suggestions_at(
    root: Option<&Node>,
    schema: &CompiledSchema,
    offset: usize,
) -> Vec<SuggestionGroup> {
    let Some(root) = root else {
        // Empty document: suggest root values with no explicit anchor, so
        // the projector falls back to the editor's word range
        let mut group = SuggestionGroup::new("", Span::new(0, 0));
        group.suggestions = value_candidates(schema);
        return if group.suggestions.is_empty() {
            vec![]
        } else {
            vec![group]
        };
    };

    match locate(root, offset) {
        None => vec![],
        Some(Location::Value { node, pointer }) => {
            let Some(sub) = schema.resolve(&pointer) else {
                return vec![];
            };
            let range = if node.is_missing() {
                // Insert at the cursor inside the hole
                Span::empty(offset)
            } else {
                node.span
            };
            let mut group = SuggestionGroup::new(pointer, range);
            group.suggestions = value_candidates(sub);
            if group.suggestions.is_empty() {
                vec![]
            } else {
                vec![group]
            }
        }
        Some(Location::Key {
            object,
            pointer,
            key_span,
            has_value,
        }) => {
            let Some(sub) = schema.resolve(&pointer) else {
                return vec![];
            };
            let mut group = SuggestionGroup::new(pointer, key_span);
            group.suggestions = key_candidates(object, sub, has_value);
            if group.suggestions.is_empty() {
                vec![]
            } else {
                vec![group]
            }
        }
    }
}

/// Candidates for a value position, in schema order
fn value_candidates(schema: &CompiledSchema) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();
    let mut push = |suggestion: Suggestion, out: &mut Vec<Suggestion>| {
        if !out.iter().any(|s| s.value == suggestion.value) {
            out.push(suggestion);
        }
    };

    if let Some(value) = &schema.const_value {
        push(annotate(Suggestion::new(value.clone()), schema), &mut out);
    }
    if let Some(values) = &schema.enum_values {
        for value in values {
            push(annotate(Suggestion::new(value.clone()), schema), &mut out);
        }
    }
    for example in &schema.examples {
        push(annotate(Suggestion::new(example.clone()), schema), &mut out);
    }
    if let Some(value) = &schema.default_value {
        push(
            annotate(Suggestion::new(value.clone()), schema).with_label(format!(
                "{} (default)",
                compact(value)
            )),
            &mut out,
        );
    }
    if let Some(types) = &schema.types {
        for t in types {
            let value = match t {
                JsonType::Object => object_skeleton(schema),
                JsonType::Boolean => {
                    push(annotate(Suggestion::new(Value::Bool(false)), schema), &mut out);
                    Value::Bool(true)
                }
                _ => t.example(),
            };
            push(annotate(Suggestion::new(value), schema), &mut out);
        }
    }

    // Variant branches contribute their own candidates, after the schema's
    for sub in schema.any_of.iter().chain(schema.all_of.iter()) {
        for suggestion in value_candidates(sub) {
            push(suggestion, &mut out);
        }
    }

    out
}

/// Candidates for an object-key position: property names the object does not
/// carry yet. When the member already has a value, only the quoted name is
/// inserted; otherwise a full `"name": <example>` snippet.
fn key_candidates(object: &Node, schema: &CompiledSchema, has_value: bool) -> Vec<Suggestion> {
    let NodeValue::Object(members) = &object.value else {
        return vec![];
    };

    schema
        .visible_properties()
        .into_iter()
        .filter(|(name, _)| !members.iter().any(|m| &m.key == name))
        .map(|(name, sub)| {
            let insert = if has_value {
                format!("\"{}\"", name)
            } else {
                format!("\"{}\": {}", name, pretty(&example_value(sub, 0)))
            };
            let mut suggestion = Suggestion::new(Value::String(name.to_string()))
                .with_label(format!("\"{}\"", name))
                .with_insert_text(insert);
            if let Some(documentation) = annotation_text(sub) {
                suggestion = suggestion.with_documentation(documentation);
            }
            suggestion
        })
        .collect()
}

fn annotate(suggestion: Suggestion, schema: &CompiledSchema) -> Suggestion {
    match annotation_text(schema) {
        Some(documentation) => suggestion.with_documentation(documentation),
        None => suggestion,
    }
}

fn annotation_text(schema: &CompiledSchema) -> Option<String> {
    match (&schema.title, &schema.description) {
        (Some(title), Some(description)) => Some(format!("**{}**\n\n{}\n", title, description)),
        (Some(title), None) => Some(format!("**{}**\n", title)),
        (None, Some(description)) => Some(format!("{}\n", description)),
        (None, None) => None,
    }
}

/// Best-effort example for a subschema, used for property snippets and
/// object skeletons. Depth-limited: nested objects beyond the limit flatten
/// to `{}`.
fn example_value(schema: &CompiledSchema, depth: usize) -> Value {
    if let Some(value) = &schema.const_value {
        return value.clone();
    }
    if let Some(values) = &schema.enum_values {
        if let Some(first) = values.first() {
            return first.clone();
        }
    }
    if let Some(example) = schema.examples.first() {
        return example.clone();
    }
    if let Some(value) = &schema.default_value {
        return value.clone();
    }
    if let Some(types) = &schema.types {
        if let Some(first) = types.first() {
            if *first == JsonType::Object && depth < 2 {
                return object_skeleton_at(schema, depth + 1);
            }
            return first.example();
        }
    }
    Value::Null
}

/// Object example carrying the schema's required members
fn object_skeleton(schema: &CompiledSchema) -> Value {
    object_skeleton_at(schema, 0)
}

fn object_skeleton_at(schema: &CompiledSchema, depth: usize) -> Value {
    let mut map = Map::new();
    for name in &schema.required {
        let member = schema
            .property(name)
            .map(|sub| example_value(sub, depth + 1))
            .unwrap_or(Value::Null);
        map.insert(name.clone(), member);
    }
    Value::Object(map)
}

fn compact(value: &Value) -> String {
    value.to_string()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde_json::json;

    fn groups_for(text: &str, schema: serde_json::Value, offset: usize) -> Vec<SuggestionGroup> {
        let outcome = parse(text);
        suggestions_at(
            outcome.root.as_ref(),
            &CompiledSchema::compile(&schema),
            offset,
        )
    }

    #[test]
    fn test_hole_suggests_typed_example() {
        let text = r#"{"foo": }"#;
        let schema = json!({"properties": {"foo": {"type": "integer"}}});
        let groups = groups_for(text, schema, 8);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].pointer, "/foo");
        // Empty anchor at the cursor inside the hole
        assert_eq!(groups[0].range, Span::empty(8));
        assert_eq!(groups[0].suggestions[0].value, json!(0));
    }

    #[test]
    fn test_existing_value_anchors_to_its_span() {
        let text = r#"{"color": "re"}"#;
        let schema = json!({"properties": {"color": {"enum": ["red", "green"]}}});
        let groups = groups_for(text, schema, 12);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].range, Span::new(10, 14));
        let values: Vec<_> = groups[0].suggestions.iter().map(|s| &s.value).collect();
        assert_eq!(values, vec![&json!("red"), &json!("green")]);
    }

    #[test]
    fn test_candidate_order_const_enum_examples_default_types() {
        let schema = json!({
            "type": "string",
            "enum": ["a", "b"],
            "examples": ["c"],
            "default": "d"
        });
        let groups = groups_for(r#""""#, schema, 1);
        let values: Vec<_> = groups[0].suggestions.iter().map(|s| &s.value).collect();
        assert_eq!(
            values,
            vec![&json!("a"), &json!("b"), &json!("c"), &json!("d"), &json!("")]
        );
    }

    #[test]
    fn test_key_position_offers_absent_properties() {
        let text = r#"{"bar": 1, }"#;
        let schema = json!({
            "properties": {
                "bar": {"type": "integer"},
                "foo": {"type": "string", "description": "a foo"}
            }
        });
        // Cursor in the gap after the comma
        let groups = groups_for(text, schema, 11);

        assert_eq!(groups.len(), 1);
        let suggestions = &groups[0].suggestions;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label.as_deref(), Some("\"foo\""));
        assert_eq!(suggestions[0].insert_text.as_deref(), Some("\"foo\": \"\""));
        assert!(suggestions[0]
            .documentation
            .as_deref()
            .unwrap()
            .contains("a foo"));
    }

    #[test]
    fn test_object_skeleton_carries_required_members() {
        let schema = json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}, "name": {"type": "string"}},
            "required": ["id"]
        });
        let groups = groups_for("", schema, 0);
        assert_eq!(groups[0].range, Span::new(0, 0));
        assert_eq!(groups[0].suggestions[0].value, json!({"id": 0}));
    }

    #[test]
    fn test_offset_outside_root_yields_no_groups() {
        let groups = groups_for("true   ", json!({"type": "boolean"}), 6);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_unknown_pointer_yields_no_groups() {
        let text = r#"{"mystery": 1}"#;
        let schema = json!({"properties": {"known": {}}, "type": "object"});
        let groups = groups_for(text, schema, 13);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_boolean_type_offers_both_values() {
        let groups = groups_for("1", json!({"type": "boolean"}), 0);
        let values: Vec<_> = groups[0].suggestions.iter().map(|s| &s.value).collect();
        assert_eq!(values, vec![&json!(false), &json!(true)]);
    }
}
