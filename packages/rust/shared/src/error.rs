//! Error types for the studio backend.
//!
//! Library crates use [`StudioError`] via `thiserror`.
//! The server app wraps this with `color-eyre` for CLI diagnostics and maps
//! it onto HTTP status codes at the request boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single violated validation rule, keyed by the schema field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Schema field name (e.g. `projectGoals`).
    pub field: String,
    /// Human-readable message for the violated rule.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Top-level error type for all studio operations.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Parsing of embedded or on-disk data failed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input rejected before any side effect ran.
    ///
    /// `fields` carries one entry per violated rule; it is empty when the
    /// caller only needs a single message (project idea validation).
    #[error("validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    /// The primary notification could not be delivered.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// The email provider failed before returning a result.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StudioError>;

impl StudioError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a single-message validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            fields: Vec::new(),
        }
    }

    /// Create a validation error carrying per-field violations.
    pub fn invalid_fields(fields: Vec<FieldError>) -> Self {
        Self::Validation {
            message: "Invalid form data".into(),
            fields,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Field-level violations, if this is a validation error.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { fields, .. } => fields,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StudioError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = StudioError::validation("Please describe your idea in more detail");
        assert!(err.to_string().contains("describe your idea"));
    }

    #[test]
    fn invalid_fields_keeps_every_violation() {
        let err = StudioError::invalid_fields(vec![
            FieldError::new("name", "Required"),
            FieldError::new("projectGoals", "Required"),
        ]);
        assert_eq!(err.to_string(), "validation error: Invalid form data");
        assert_eq!(err.field_errors().len(), 2);
        assert_eq!(err.field_errors()[1].field, "projectGoals");
    }

    #[test]
    fn non_validation_errors_have_no_fields() {
        let err = StudioError::Dispatch("provider down".into());
        assert!(err.field_errors().is_empty());
    }
}
