use crate::span::Span;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One completion candidate
///
/// `label` defaults to the compact JSON rendering of `value` and
/// `insert_text` to the pretty-printed rendering; `replace`, when absent,
/// defaults to the whole group's query range. `separator` is appended
/// verbatim after the insert text (e.g. a trailing `,`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub value: Value,
    pub label: Option<String>,
    pub documentation: Option<String>,
    pub insert_text: Option<String>,
    pub replace: Option<Span>,
    pub separator: Option<String>,
}

impl Suggestion {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            label: None,
            documentation: None,
            insert_text: None,
            replace: None,
            separator: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_insert_text(mut self, insert_text: impl Into<String>) -> Self {
        self.insert_text = Some(insert_text.into());
        self
    }

    pub fn with_replace(mut self, replace: Span) -> Self {
        self.replace = Some(replace);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

/// A batch of completion candidates anchored to one text span
///
/// Candidate order is significant and must be preserved all the way to the
/// editor; capping the list is the projector's job, not the engine's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionGroup {
    /// JSON Pointer of the queried location
    pub pointer: String,

    /// Engine-reported query range; `0..0` means "no explicit anchor"
    pub range: Span,

    pub suggestions: Vec<Suggestion>,
}

impl SuggestionGroup {
    pub fn new(pointer: impl Into<String>, range: Span) -> Self {
        Self {
            pointer: pointer.into(),
            range,
            suggestions: Vec::new(),
        }
    }

    pub fn push(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_chain() {
        let suggestion = Suggestion::new(json!({"a": 1}))
            .with_label("a-object")
            .with_replace(Span::new(2, 6))
            .with_separator(",");

        assert_eq!(suggestion.label.as_deref(), Some("a-object"));
        assert_eq!(suggestion.replace, Some(Span::new(2, 6)));
        assert_eq!(suggestion.separator.as_deref(), Some(","));
        assert!(suggestion.insert_text.is_none());
    }

    #[test]
    fn test_group_keeps_order() {
        let mut group = SuggestionGroup::new("/foo", Span::new(3, 7));
        group.push(Suggestion::new(json!("b")));
        group.push(Suggestion::new(json!("a")));

        assert_eq!(group.suggestions[0].value, json!("b"));
        assert_eq!(group.suggestions[1].value, json!("a"));
    }
}
