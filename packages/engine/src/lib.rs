//! # Schemapad Engine
//!
//! Reference typed-JSON engine behind the `DocumentEngine` contract:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tokenizer: text → spanned JSON tokens       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: tokens → spanned tree + markers     │
//! │  - total: holes instead of hard errors      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ schema / validator / suggest                │
//! │  - compiled dialect, degenerate-tolerant    │
//! │  - span-anchored markers                    │
//! │  - cursor-offset completion candidates      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! `TypedJson` bundles the pieces into immutable snapshots; `JsonEngine`
//! exposes them through the capability contract consumed by
//! `schemapad-editor`.

pub mod node;
pub mod parser;
pub mod schema;
pub mod suggest;
pub mod tokenizer;
pub mod typed;
pub mod validator;

#[cfg(feature = "pretty-errors")]
pub mod report;

pub use node::{locate, Location, Member, Node, NodeValue};
pub use parser::{parse, ParseOutcome};
pub use schema::{Additional, CompiledSchema, JsonType};
pub use typed::{JsonEngine, TypedJson};

// Re-export the contract types engine consumers deal in
pub use schemapad_common::{
    DocumentEngine, EngineError, Marker, Severity, Span, Suggestion, SuggestionGroup,
};
