//! # Typed Session
//!
//! Owns the schema/instance document pair and the single dependency edge
//! between them: every schema edit re-derives the instance against the new
//! schema value, unconditionally. A schema with problems still propagates,
//! because "which constraints apply right now" must track the schema text
//! the author is looking at, not some older clean revision.
//!
//! The schema document is itself validated, against the engine's built-in
//! meta schema when it has one. Transitions are total: they return the
//! decoration state for both documents and never fail after construction.

use crate::binding::{DocumentBinding, DocumentRole};
use crate::completion::{self, CompletionList, CompletionOptions};
use crate::errors::SessionError;
use crate::validation::{self, MarkerDecoration};
use schemapad_common::DocumentEngine;
use serde::{Deserialize, Serialize};

/// Decoration state of both documents after a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub schema_markers: Vec<MarkerDecoration>,
    pub instance_markers: Vec<MarkerDecoration>,
    /// True when either binding is running on a last-known-good value
    /// because the most recent engine call failed
    pub stale: bool,
}

pub struct TypedSession<E: DocumentEngine> {
    engine: E,
    schema: DocumentBinding<E>,
    instance: DocumentBinding<E>,
}

impl<E: DocumentEngine> TypedSession<E> {
    pub fn new(engine: E, schema_text: &str, instance_text: &str) -> Result<Self, SessionError> {
        let meta = engine.meta_schema();
        let schema =
            DocumentBinding::new(&engine, DocumentRole::Schema, schema_text, meta.as_ref())?;
        let instance = DocumentBinding::new(
            &engine,
            DocumentRole::Instance,
            instance_text,
            Some(schema.value()),
        )?;

        Ok(Self {
            engine,
            schema,
            instance,
        })
    }

    /// Full new text for the schema document. Re-derives the schema binding
    /// and then the instance against the new schema value, in that order.
    pub fn on_schema_text_changed(&mut self, text: &str) -> SessionUpdate {
        self.schema = self.schema.apply_text(&self.engine, text);
        self.instance = self.instance.apply_schema(&self.engine, self.schema.value());
        self.project()
    }

    /// Full new text for the instance document. The schema side is
    /// untouched.
    pub fn on_instance_text_changed(&mut self, text: &str) -> SessionUpdate {
        self.instance = self.instance.apply_text(&self.engine, text);
        self.project()
    }

    /// Current decoration state without transitioning
    pub fn project(&self) -> SessionUpdate {
        SessionUpdate {
            schema_markers: validation::project(&self.engine, &self.schema),
            instance_markers: validation::project(&self.engine, &self.instance),
            stale: self.schema.is_stale() || self.instance.is_stale(),
        }
    }

    /// Completion query against the current state of one document
    pub fn completions_at(
        &self,
        role: DocumentRole,
        cursor_offset: usize,
        options: &CompletionOptions,
    ) -> Option<CompletionList> {
        completion::project(&self.engine, self.binding(role), cursor_offset, options)
    }

    pub fn binding(&self, role: DocumentRole) -> &DocumentBinding<E> {
        match role {
            DocumentRole::Schema => &self.schema,
            DocumentRole::Instance => &self.instance,
        }
    }

    pub fn schema(&self) -> &DocumentBinding<E> {
        &self.schema
    }

    pub fn instance(&self) -> &DocumentBinding<E> {
        &self.instance
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
