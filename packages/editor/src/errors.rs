//! Error types for the editing core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// The engine call itself failed while building the session's initial
    /// values. After construction, engine failures never surface as errors;
    /// they flag the affected binding stale instead.
    #[error("Engine error: {0}")]
    Engine(#[from] schemapad_common::EngineError),
}
