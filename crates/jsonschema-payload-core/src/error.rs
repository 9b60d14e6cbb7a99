//! Error types for schema compilation.
//!
//! Only a structurally broken *schema* produces an error. An invalid payload is
//! the normal outcome of validation and is reported through
//! [`crate::ValidationResult`], never through this type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Schema node at {path} must be an object or a boolean, found {found}")]
    NotASchema { path: String, found: String },

    #[error("Invalid '{keyword}' at {path}: expected {expected}")]
    InvalidKeyword {
        path: String,
        keyword: String,
        expected: String,
    },

    #[error("Invalid pattern at {path} ({pattern:?}): {message}")]
    InvalidPattern {
        path: String,
        pattern: String,
        message: String,
    },

    #[error("Malformed reference at {path}: '$ref' must be a string")]
    MalformedReference { path: String },
}

impl SchemaError {
    /// JSON Pointer of the schema node that failed to compile.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::NotASchema { path, .. }
            | SchemaError::InvalidKeyword { path, .. }
            | SchemaError::InvalidPattern { path, .. }
            | SchemaError::MalformedReference { path } => path,
        }
    }

    pub(crate) fn invalid_keyword(path: &str, keyword: &str, expected: &str) -> Self {
        SchemaError::InvalidKeyword {
            path: path.to_string(),
            keyword: keyword.to_string(),
            expected: expected.to_string(),
        }
    }
}
