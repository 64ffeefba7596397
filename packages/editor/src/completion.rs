//! Suggestion projector
//!
//! Asks the engine for suggestion groups at a cursor offset and turns the
//! first group into an editor-ready completion list. Engines may report
//! several candidate anchor points; the first (innermost) one wins. The
//! replacement range prefers the engine's anchor; the editor word range at
//! the cursor is only the fallback for the canonical zero span, which means
//! the engine had no explicit anchor to offer.

use crate::binding::DocumentBinding;
use schemapad_common::{DocumentEngine, LineIndex, Span};
use serde::{Deserialize, Serialize};

/// Default cap on presented candidates, bounding completion-list rendering
/// cost.
pub const DEFAULT_MAX_ITEMS: usize = 42;

#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub max_items: usize,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    /// `"{pointer} {startLine}:{startCol}-{endLine}:{endCol}"`
    pub detail: String,
    /// Markdown: the candidate's documentation plus a fenced code block of
    /// the pretty-printed value
    pub documentation: String,
    pub insert_text: String,
    pub replace: Span,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionList {
    pub pointer: String,
    pub range: Span,
    pub items: Vec<CompletionItem>,
}

impl CompletionList {
    /// Accept a candidate: one atomic splice of its replace range with its
    /// insert text. Returns the new text and the cursor offset after the
    /// insertion.
    pub fn apply(&self, index: usize, text: &str) -> Option<(String, usize)> {
        let item = self.items.get(index)?;
        let replace = item.replace;
        if replace.start > replace.end
            || replace.end > text.len()
            || !text.is_char_boundary(replace.start)
            || !text.is_char_boundary(replace.end)
        {
            return None;
        }

        let mut out = String::with_capacity(text.len() + item.insert_text.len());
        out.push_str(&text[..replace.start]);
        out.push_str(&item.insert_text);
        out.push_str(&text[replace.end..]);
        Some((out, replace.start + item.insert_text.len()))
    }
}

pub fn project<E: DocumentEngine>(
    engine: &E,
    binding: &DocumentBinding<E>,
    cursor_offset: usize,
    options: &CompletionOptions,
) -> Option<CompletionList> {
    let mut groups = engine.suggestions_at(binding.value(), cursor_offset);
    if groups.is_empty() {
        return None;
    }
    let group = groups.swap_remove(0);

    let text = binding.text();
    let index = binding.line_index();

    let range = if group.range.is_zero() {
        LineIndex::word_range_at(text, cursor_offset)
    } else {
        group.range
    };

    let items = group
        .suggestions
        .into_iter()
        .take(options.max_items)
        .map(|suggestion| {
            let pretty = serde_json::to_string_pretty(&suggestion.value)
                .unwrap_or_else(|_| suggestion.value.to_string());

            let label = suggestion
                .label
                .unwrap_or_else(|| suggestion.value.to_string());
            let insert_text = format!(
                "{}{}",
                suggestion.insert_text.unwrap_or_else(|| pretty.clone()),
                suggestion.separator.unwrap_or_default()
            );
            let documentation = format!(
                "{}```\n{}\n```",
                suggestion.documentation.unwrap_or_default(),
                pretty
            );

            let replace = suggestion.replace.unwrap_or(range);
            let start = index.position_at(text, replace.start.min(text.len()));
            let end = index.position_at(text, replace.end.min(text.len()));
            let detail = format!(
                "{} {}:{}-{}:{}",
                group.pointer, start.line, start.column, end.line, end.column
            );

            CompletionItem {
                label,
                detail,
                documentation,
                insert_text,
                replace,
                start_line: start.line,
                start_column: start.column,
                end_line: end.line,
                end_column: end.column,
            }
        })
        .collect();

    Some(CompletionList {
        pointer: group.pointer,
        range,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::DocumentRole;
    use schemapad_common::{EngineError, Marker, Suggestion, SuggestionGroup};
    use serde_json::json;

    /// Engine stub that replays canned suggestion groups
    struct CannedEngine {
        groups: Vec<SuggestionGroup>,
    }

    impl DocumentEngine for CannedEngine {
        type Value = ();

        fn derive_initial(&self, _schema: Option<&()>) -> Result<(), EngineError> {
            Ok(())
        }

        fn derive_with_schema(&self, _value: &(), _schema: &()) -> Result<(), EngineError> {
            Ok(())
        }

        fn derive_with_text(&self, _value: &(), _text: &str) -> Result<(), EngineError> {
            Ok(())
        }

        fn markers_of(&self, _value: &()) -> Vec<Marker> {
            vec![]
        }

        fn suggestions_at(&self, _value: &(), _offset: usize) -> Vec<SuggestionGroup> {
            self.groups.clone()
        }
    }

    fn binding_for(engine: &CannedEngine, text: &str) -> DocumentBinding<CannedEngine> {
        DocumentBinding::new(engine, DocumentRole::Instance, text, None).unwrap()
    }

    #[test]
    fn test_no_groups_means_no_popup() {
        let engine = CannedEngine { groups: vec![] };
        let binding = binding_for(&engine, "{}");
        assert!(project(&engine, &binding, 1, &CompletionOptions::default()).is_none());
    }

    #[test]
    fn test_first_group_wins() {
        let mut inner = SuggestionGroup::new("/inner", Span::new(2, 4));
        inner.push(Suggestion::new(json!(1)));
        let mut outer = SuggestionGroup::new("", Span::new(0, 6));
        outer.push(Suggestion::new(json!(2)));

        let engine = CannedEngine {
            groups: vec![inner, outer],
        };
        let binding = binding_for(&engine, "[1, 2]");

        let list = project(&engine, &binding, 3, &CompletionOptions::default()).unwrap();
        assert_eq!(list.pointer, "/inner");
        assert_eq!(list.range, Span::new(2, 4));
    }

    #[test]
    fn test_candidate_list_is_capped() {
        let mut group = SuggestionGroup::new("", Span::new(0, 1));
        for i in 0..100 {
            group.push(Suggestion::new(json!(i)));
        }
        let engine = CannedEngine {
            groups: vec![group],
        };
        let binding = binding_for(&engine, "0");

        let list = project(&engine, &binding, 0, &CompletionOptions::default()).unwrap();
        assert_eq!(list.items.len(), DEFAULT_MAX_ITEMS);
        // Order preserved, truncated from the tail
        assert_eq!(list.items[0].label, "0");
        assert_eq!(list.items[41].label, "41");

        let list = project(
            &engine,
            &binding,
            0,
            &CompletionOptions { max_items: 3 },
        )
        .unwrap();
        assert_eq!(list.items.len(), 3);
    }

    #[test]
    fn test_zero_anchor_falls_back_to_word_range() {
        let mut group = SuggestionGroup::new("", Span::new(0, 0));
        group.push(Suggestion::new(json!(true)));
        let engine = CannedEngine {
            groups: vec![group],
        };
        let binding = binding_for(&engine, "{\"a\": tru}");

        let list = project(&engine, &binding, 8, &CompletionOptions::default()).unwrap();
        // "tru" sits at 6..9
        assert_eq!(list.range, Span::new(6, 9));
        assert_eq!(list.items[0].replace, Span::new(6, 9));
    }

    #[test]
    fn test_defaults_and_detail_formula() {
        let mut group = SuggestionGroup::new("/a", Span::new(6, 9));
        group.push(Suggestion::new(json!("x")).with_separator(","));
        let engine = CannedEngine {
            groups: vec![group],
        };
        let binding = binding_for(&engine, "{\"a\": tru}");

        let list = project(&engine, &binding, 8, &CompletionOptions::default()).unwrap();
        let item = &list.items[0];
        assert_eq!(item.label, "\"x\"");
        assert_eq!(item.insert_text, "\"x\",");
        assert_eq!(item.detail, "/a 1:7-1:10");
        assert!(item.documentation.contains("```\n\"x\"\n```"));
    }

    #[test]
    fn test_apply_splices_and_positions_cursor() {
        let mut group = SuggestionGroup::new("/a", Span::new(6, 9));
        group.push(Suggestion::new(json!(true)));
        let engine = CannedEngine {
            groups: vec![group],
        };
        let text = "{\"a\": tru}";
        let binding = binding_for(&engine, text);

        let list = project(&engine, &binding, 8, &CompletionOptions::default()).unwrap();
        let (new_text, cursor) = list.apply(0, text).unwrap();
        assert_eq!(new_text, "{\"a\": true}");
        assert_eq!(cursor, 10);
    }

    #[test]
    fn test_apply_is_byte_accurate_near_multibyte() {
        let mut group = SuggestionGroup::new("/é", Span::new(7, 9));
        group.push(Suggestion::new(json!(42)));
        let engine = CannedEngine {
            groups: vec![group],
        };
        // 'é' is two bytes; the value "xx" sits at bytes 7..9
        let text = "{\"é\": xx}";
        let binding = binding_for(&engine, text);

        let list = project(&engine, &binding, 8, &CompletionOptions::default()).unwrap();
        let (new_text, cursor) = list.apply(0, text).unwrap();
        assert_eq!(new_text, "{\"é\": 42}");
        assert_eq!(cursor, 9);
    }

    #[test]
    fn test_apply_rejects_mid_character_range() {
        let mut group = SuggestionGroup::new("", Span::new(0, 0));
        group.push(Suggestion::new(json!(1)));
        let engine = CannedEngine {
            groups: vec![group],
        };
        // Offset 2 is inside the two-byte 'é', so the fallback word range
        // cannot land on a char boundary
        let text = "\"é\"";
        let binding = binding_for(&engine, text);

        let list = project(&engine, &binding, 2, &CompletionOptions::default()).unwrap();
        assert_eq!(list.range, Span::empty(2));
        assert!(list.apply(0, text).is_none());
    }
}
