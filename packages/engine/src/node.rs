//! Spanned JSON tree
//!
//! Every node remembers the byte span it was parsed from so validation
//! markers and suggestion anchors can point back into the text. A `Missing`
//! node is a hole left by the error-tolerant parser (e.g. the value slot in
//! `{"foo": }`); suggestions anchor to it, validation skips it.

use schemapad_common::Span;
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: NodeValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Node>),
    Object(Vec<Member>),
    Missing,
}

/// One `key: value` pair of an object, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub key: String,
    pub key_span: Span,
    pub value: Node,
}

impl Node {
    pub fn new(value: NodeValue, span: Span) -> Self {
        Self { value, span }
    }

    pub fn missing(span: Span) -> Self {
        Self::new(NodeValue::Missing, span)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.value, NodeValue::Missing)
    }

    /// Type name as it appears in schema `type` keywords and messages
    pub fn kind(&self) -> &'static str {
        match &self.value {
            NodeValue::Null => "null",
            NodeValue::Bool(_) => "boolean",
            NodeValue::Number(n) => {
                if n.fract() == 0.0 {
                    "integer"
                } else {
                    "number"
                }
            }
            NodeValue::String(_) => "string",
            NodeValue::Array(_) => "array",
            NodeValue::Object(_) => "object",
            NodeValue::Missing => "missing",
        }
    }

    /// Plain JSON value with spans (and holes) erased
    pub fn to_json(&self) -> Value {
        match &self.value {
            NodeValue::Null | NodeValue::Missing => Value::Null,
            NodeValue::Bool(b) => Value::Bool(*b),
            NodeValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && *n >= i64::MIN as f64 && *n <= i64::MAX as f64
                {
                    Value::Number(Number::from(*n as i64))
                } else {
                    Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null)
                }
            }
            NodeValue::String(s) => Value::String(s.clone()),
            NodeValue::Array(items) => Value::Array(items.iter().map(Node::to_json).collect()),
            NodeValue::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|m| (m.key.clone(), m.value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Escape one reference token per RFC 6901: `~` → `~0`, `/` → `~1`
pub fn escape_pointer_token(raw: &str) -> String {
    raw.replace('~', "~0").replace('/', "~1")
}

/// Undo RFC 6901 escaping for one reference token
pub fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Append one reference token to a JSON Pointer
pub fn push_pointer(pointer: &str, token: &str) -> String {
    format!("{}/{}", pointer, escape_pointer_token(token))
}

/// Where a cursor offset landed inside the tree
#[derive(Debug, PartialEq)]
pub enum Location<'a> {
    /// At a value (or a hole where a value belongs)
    Value { node: &'a Node, pointer: String },

    /// At an object-key position: either inside an existing key span or in
    /// the gap of an object body where a new key could start. `key_span` is
    /// the span to replace (empty in the gap case); `has_value` is whether
    /// the member already carries a real value.
    Key {
        object: &'a Node,
        pointer: String,
        key_span: Span,
        has_value: bool,
    },
}

/// Find the innermost location containing `offset`.
///
/// Returns `None` when the offset falls outside the root entirely.
pub fn locate(root: &Node, offset: usize) -> Option<Location<'_>> {
    if !root.span.contains(offset) {
        return None;
    }
    Some(locate_in(root, offset, String::new()))
}

fn locate_in(node: &Node, offset: usize, pointer: String) -> Location<'_> {
    match &node.value {
        NodeValue::Object(members) => {
            for member in members {
                if member.key_span.contains(offset) {
                    return Location::Key {
                        object: node,
                        pointer,
                        key_span: member.key_span,
                        has_value: !member.value.is_missing(),
                    };
                }
                if member.value.span.contains(offset) {
                    return locate_in(&member.value, offset, push_pointer(&pointer, &member.key));
                }
            }
            // Inside the object body but in no member: a new key could start here
            Location::Key {
                object: node,
                pointer,
                key_span: Span::empty(offset),
                has_value: false,
            }
        }
        NodeValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.span.contains(offset) {
                    return locate_in(item, offset, format!("{}/{}", pointer, index));
                }
            }
            // In the array body between items: treat as the next element slot
            Location::Value {
                node,
                pointer: format!("{}/{}", pointer, items.len()),
            }
        }
        _ => Location::Value { node, pointer },
    }
}
