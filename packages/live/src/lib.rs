//! # Schemapad Live Host
//!
//! Async wrapper around `schemapad-editor`'s `TypedSession` for hosts that
//! feed edits from channels instead of calling the session directly. The
//! session lives on one tokio task; edits coalesce per batch, snapshots
//! publish over a watch channel, and completion queries are answered on the
//! latest committed state.

pub mod host;

pub use host::{DecorationSnapshot, EditEvent, LiveError, LiveSession};
