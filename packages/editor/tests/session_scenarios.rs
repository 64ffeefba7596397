//! End-to-end session behavior against the reference JSON engine

use schemapad_editor::{CompletionOptions, DocumentRole, SessionUpdate, TypedSession};
use schemapad_engine::JsonEngine;

fn session(schema: &str, instance: &str) -> TypedSession<JsonEngine> {
    TypedSession::new(JsonEngine::new(), schema, instance).expect("session construction")
}

#[test]
fn test_type_mismatch_marks_instance_not_schema() {
    let session = session(r#"{"type": "boolean"}"#, r#"{"hello": "world"}"#);
    let update = session.project();

    assert!(update.schema_markers.is_empty());
    assert!(!update.instance_markers.is_empty());
    let first = &update.instance_markers[0];
    assert!(first.message.contains("boolean"));
    assert_eq!(first.start_line, 1);
    assert_eq!(first.start_column, 1);
}

#[test]
fn test_schema_edit_revalidates_instance_in_place() {
    let mut session = session(r#"{"type": "boolean"}"#, r#"{"hello": "world"}"#);
    assert!(!session.project().instance_markers.is_empty());

    // The instance text is never re-submitted; the schema edit alone must
    // clear its markers
    let update = session.on_schema_text_changed(r#"{"type": "object"}"#);
    assert!(update.schema_markers.is_empty());
    assert!(update.instance_markers.is_empty());
}

#[test]
fn test_completion_in_hole_offers_schema_typed_value() {
    let schema = r#"{"type": "object", "properties": {"foo": {"type": "integer"}}}"#;
    let session = session(schema, r#"{"foo": }"#);

    let list = session
        .completions_at(DocumentRole::Instance, 8, &CompletionOptions::default())
        .expect("completion list");

    assert_eq!(list.pointer, "/foo");
    let insert = &list.items[0].insert_text;
    let parsed: serde_json::Value = serde_json::from_str(insert).expect("insert text is JSON");
    assert!(parsed.is_i64() || parsed.is_u64());
}

#[test]
fn test_no_candidates_means_no_list() {
    let session = session(r#"{"type": "boolean"}"#, "true   ");
    // Cursor in trailing whitespace, outside any node
    let list = session.completions_at(DocumentRole::Instance, 6, &CompletionOptions::default());
    assert!(list.is_none());
}

#[test]
fn test_schema_document_is_meta_validated() {
    let session = session(r#"{"type": 42}"#, "true");
    let update = session.project();
    assert!(!update.schema_markers.is_empty());
}

#[test]
fn test_broken_schema_still_propagates() {
    let mut session = session(r#"{"type": "boolean"}"#, r#"{"hello": "world"}"#);
    assert!(!session.project().instance_markers.is_empty());

    // Truncated schema text: the schema document gains parse markers and its
    // degenerate value still reaches the instance
    let update = session.on_schema_text_changed(r#"{"type": "#);
    assert!(!update.schema_markers.is_empty());
    assert!(update.instance_markers.is_empty());
    assert!(!update.stale);
}

#[test]
fn test_instance_edit_is_idempotent() {
    let mut session = session(r#"{"type": "boolean"}"#, "true");
    let once = session.on_instance_text_changed(r#"{"a": 1}"#);
    let twice = session.on_instance_text_changed(r#"{"a": 1}"#);
    assert_eq!(once, twice);
}

#[test]
fn test_last_schema_edit_wins() {
    let mut live = session("{}", r#"{"n": "x"}"#);
    live.on_schema_text_changed(r#"{"type": "array"}"#);
    live.on_schema_text_changed(r#"{"type": "boolean"}"#);
    let final_schema = r#"{"properties": {"n": {"type": "integer"}}}"#;
    live.on_schema_text_changed(final_schema);
    let update = live.on_instance_text_changed(r#"{"n": "y"}"#);

    let mut replay = session("{}", "null");
    replay.on_schema_text_changed(final_schema);
    let expected = replay.on_instance_text_changed(r#"{"n": "y"}"#);

    assert_eq!(update, expected);
}

#[test]
fn test_acceptance_splices_next_to_multibyte_text() {
    let schema = r#"{"type": "object", "properties": {"é": {"type": "integer"}}}"#;
    let text = "{\"é\": }";
    let session = session(schema, text);

    let list = session
        .completions_at(DocumentRole::Instance, 7, &CompletionOptions::default())
        .expect("completion list");
    let (new_text, cursor) = list.apply(0, text).expect("splice");

    assert_eq!(new_text, "{\"é\": 0}");
    assert_eq!(cursor, 8);
}

#[test]
fn test_marker_coordinates_cover_multiline_documents() {
    let schema = r#"{"type": "object", "required": ["id"]}"#;
    let session = session(schema, "{\n  \"name\": \"x\"\n}");
    let update: SessionUpdate = session.project();

    assert_eq!(update.instance_markers.len(), 1);
    let marker = &update.instance_markers[0];
    assert!(marker.message.contains("\"id\""));
    assert_eq!(marker.start_line, 1);
    assert!(marker.end_line >= marker.start_line);
}
