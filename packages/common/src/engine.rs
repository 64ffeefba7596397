//! Engine capability contract
//!
//! The editing core depends only on this trait; the reference implementation
//! lives in `schemapad-engine`, but any engine with the same value semantics
//! (immutable snapshots, functional re-derivation) slots in.

use crate::marker::Marker;
use crate::suggest::SuggestionGroup;
use thiserror::Error;

/// Failure of the engine call itself, not of the document being validated.
///
/// Document validity problems are always expressed as markers; this error
/// exists for the "engine is unreachable / internal fault" case, which is
/// fatal to a single revalidation cycle only.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Engine fault: {0}")]
    Fault(String),
}

/// Schema-aware document engine
///
/// `Value` is an immutable snapshot of "this text, interpreted against this
/// schema (or none)". Every derive call produces a new value; nothing is
/// mutated in place, which keeps the schema → instance dependency edge
/// race-free for the session.
pub trait DocumentEngine {
    type Value: Clone;

    /// Seed value for a fresh document, optionally bound to a schema value.
    fn derive_initial(&self, schema: Option<&Self::Value>) -> Result<Self::Value, EngineError>;

    /// Re-derive against a new schema value, keeping the current text.
    fn derive_with_schema(
        &self,
        value: &Self::Value,
        schema: &Self::Value,
    ) -> Result<Self::Value, EngineError>;

    /// Re-derive for a new full text, keeping the current schema dependency.
    fn derive_with_text(&self, value: &Self::Value, text: &str)
        -> Result<Self::Value, EngineError>;

    /// Validation markers for a value. Total: an invalid document yields
    /// markers, never an error.
    fn markers_of(&self, value: &Self::Value) -> Vec<Marker>;

    /// Completion candidates at a byte offset. An empty result means
    /// "no popup", not an error.
    fn suggestions_at(&self, value: &Self::Value, offset: usize) -> Vec<SuggestionGroup>;

    /// Built-in schema for schema documents, if the engine has one.
    /// Sessions use it as the schema binding's own dependency so schema
    /// documents self-validate.
    fn meta_schema(&self) -> Option<Self::Value> {
        None
    }
}
