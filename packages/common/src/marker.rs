use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Severity level of a validation marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A validation diagnostic anchored to a text span
///
/// Markers are produced fresh on every revalidation and never mutated; the
/// full list replaces the previous decoration set atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// The severity level
    pub severity: Severity,

    /// JSON Pointer to the offending location
    pub pointer: String,

    /// Human-readable message
    pub message: String,

    /// Source span where the issue was found
    pub span: Span,
}

impl Marker {
    pub fn error(pointer: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            pointer: pointer.into(),
            message: message.into(),
            span,
        }
    }

    pub fn warning(pointer: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            pointer: pointer.into(),
            message: message.into(),
            span,
        }
    }

    pub fn info(pointer: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Info,
            pointer: pointer.into(),
            message: message.into(),
            span,
        }
    }
}
