//! # Document Binding
//!
//! Wraps one logical document of a session: its full text, the cached
//! line-break index for that text, and the engine-derived value. Bindings
//! are replaced, never mutated: `apply_text`/`apply_schema` return a new
//! binding and the caller swaps its reference, matching the engine's
//! functional value semantics.

use crate::errors::SessionError;
use schemapad_common::{DocumentEngine, LineIndex};
use serde::{Deserialize, Serialize};

/// Which side of the session a binding plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentRole {
    Schema,
    Instance,
}

pub struct DocumentBinding<E: DocumentEngine> {
    role: DocumentRole,
    text: String,
    line_index: LineIndex,
    value: E::Value,
    stale: bool,
}

impl<E: DocumentEngine> Clone for DocumentBinding<E> {
    fn clone(&self) -> Self {
        Self {
            role: self.role,
            text: self.text.clone(),
            line_index: self.line_index.clone(),
            value: self.value.clone(),
            stale: self.stale,
        }
    }
}

impl<E: DocumentEngine> DocumentBinding<E> {
    /// Create a binding with its value computed once, eagerly.
    pub fn new(
        engine: &E,
        role: DocumentRole,
        initial_text: &str,
        schema: Option<&E::Value>,
    ) -> Result<Self, SessionError> {
        let seed = engine.derive_initial(schema)?;
        let value = engine.derive_with_text(&seed, initial_text)?;

        Ok(Self {
            role,
            text: initial_text.to_string(),
            line_index: LineIndex::new(initial_text),
            value,
            stale: false,
        })
    }

    /// New binding for a new full text, re-derived against the current
    /// schema dependency.
    ///
    /// Total: if the engine call itself fails, the returned binding carries
    /// the new text but keeps the last-known-good value and is flagged
    /// stale. A later successful derivation clears the flag.
    pub fn apply_text(&self, engine: &E, new_text: &str) -> Self {
        match engine.derive_with_text(&self.value, new_text) {
            Ok(value) => Self {
                role: self.role,
                text: new_text.to_string(),
                line_index: LineIndex::new(new_text),
                value,
                stale: false,
            },
            Err(_) => Self {
                role: self.role,
                text: new_text.to_string(),
                line_index: LineIndex::new(new_text),
                value: self.value.clone(),
                stale: true,
            },
        }
    }

    /// New binding with the same text, re-derived against a new schema
    /// value. Instance-role bindings only; same staleness policy as
    /// `apply_text`.
    pub fn apply_schema(&self, engine: &E, schema: &E::Value) -> Self {
        match engine.derive_with_schema(&self.value, schema) {
            Ok(value) => Self {
                role: self.role,
                text: self.text.clone(),
                line_index: self.line_index.clone(),
                value,
                stale: false,
            },
            Err(_) => Self {
                role: self.role,
                text: self.text.clone(),
                line_index: self.line_index.clone(),
                value: self.value.clone(),
                stale: true,
            },
        }
    }

    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn value(&self) -> &E::Value {
        &self.value
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}
