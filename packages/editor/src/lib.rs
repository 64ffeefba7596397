//! # Schemapad Editing Core
//!
//! Engine-agnostic core of a live schema/instance editing session. Two
//! documents, one dependency edge:
//!
//! ```text
//!   schema text ──▶ schema binding ──▶ schema value
//!                                          │ (every schema edit)
//!                                          ▼
//!   instance text ─▶ instance binding ─▶ instance value
//!                                          │
//!                      ┌───────────────────┴───────────────┐
//!                      ▼                                   ▼
//!              validation projector                suggestion projector
//!              (MarkerDecoration)                  (CompletionList)
//! ```
//!
//! Everything here is expressed against the [`DocumentEngine`] contract from
//! `schemapad-common`; the reference engine lives in `schemapad-engine`.

pub mod binding;
pub mod completion;
pub mod errors;
pub mod session;
pub mod validation;

pub use binding::{DocumentBinding, DocumentRole};
pub use completion::{CompletionItem, CompletionList, CompletionOptions, DEFAULT_MAX_ITEMS};
pub use errors::SessionError;
pub use schemapad_common::DocumentEngine;
pub use session::{SessionUpdate, TypedSession};
pub use validation::MarkerDecoration;
