//! Validation projector
//!
//! Turns a binding's engine markers into editor decorations: spans mapped to
//! 1-based line/column coordinates, sorted ascending by start offset (stable,
//! ties keep engine-reported order) so rendering is deterministic regardless
//! of engine emission order. Runs after every transition, not on save.

use crate::binding::DocumentBinding;
use schemapad_common::{DocumentEngine, Severity, Span};
use serde::{Deserialize, Serialize};

/// A marker with editor coordinates attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDecoration {
    pub severity: Severity,
    pub message: String,
    /// JSON Pointer, rendered as the decoration source
    pub source: String,
    pub span: Span,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

pub fn project<E: DocumentEngine>(engine: &E, binding: &DocumentBinding<E>) -> Vec<MarkerDecoration> {
    let mut markers = engine.markers_of(binding.value());
    markers.sort_by_key(|marker| marker.span.start);

    let text = binding.text();
    let index = binding.line_index();
    markers
        .into_iter()
        .map(|marker| {
            let start = index.position_at(text, marker.span.start.min(text.len()));
            let end = index.position_at(text, marker.span.end.min(text.len()));
            MarkerDecoration {
                severity: marker.severity,
                message: marker.message,
                source: marker.pointer,
                span: marker.span,
                start_line: start.line,
                start_column: start.column,
                end_line: end.line,
                end_column: end.column,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::DocumentRole;
    use schemapad_common::{EngineError, Marker, SuggestionGroup};

    /// Engine stub that replays canned markers
    struct CannedEngine {
        markers: Vec<Marker>,
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
            self.markers.clone()
        }

        fn suggestions_at(&self, _value: &(), _offset: usize) -> Vec<SuggestionGroup> {
            vec![]
        }
    }

    #[test]
    fn test_sorts_by_start_offset_stable() {
        let engine = CannedEngine {
            markers: vec![
                Marker::error("/c", "third", Span::new(8, 9)),
                Marker::error("/a", "first", Span::new(1, 2)),
                Marker::warning("/b1", "tie one", Span::new(4, 6)),
                Marker::error("/b2", "tie two", Span::new(4, 5)),
            ],
        };
        let binding =
            DocumentBinding::new(&engine, DocumentRole::Instance, "0123456789", None).unwrap();

        let decorations = project(&engine, &binding);
        let sources: Vec<&str> = decorations.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["/a", "/b1", "/b2", "/c"]);
    }

    #[test]
    fn test_maps_spans_to_editor_coordinates() {
        let engine = CannedEngine {
            markers: vec![Marker::error("", "bad", Span::new(2, 5))],
        };
        let binding =
            DocumentBinding::new(&engine, DocumentRole::Instance, "a\nbcd\ne", None).unwrap();

        let decorations = project(&engine, &binding);
        assert_eq!(decorations[0].start_line, 2);
        assert_eq!(decorations[0].start_column, 1);
        assert_eq!(decorations[0].end_line, 2);
        assert_eq!(decorations[0].end_column, 4);
    }

    #[test]
    fn test_out_of_range_span_is_clamped() {
        let engine = CannedEngine {
            markers: vec![Marker::error("", "beyond", Span::new(1, 99))],
        };
        let binding = DocumentBinding::new(&engine, DocumentRole::Instance, "ab", None).unwrap();

        let decorations = project(&engine, &binding);
        assert_eq!(decorations[0].end_line, 1);
        assert_eq!(decorations[0].end_column, 3);
    }
}
