//! Error types for single-value checks.

use recval_core::{ConstraintKind, FieldType};
use thiserror::Error;

/// Failure of a single check on one value.
///
/// The engine attaches the field path and converts these into
/// [`ValidationError`](recval_core::ValidationError)s.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    /// Value cannot be read as the expected type
    #[error("Input should be a valid {expected}, got {actual}")]
    TypeMismatch {
        expected: FieldType,
        actual: &'static str,
    },

    /// Value has the right type but fails a constraint
    #[error("{message}")]
    Violation {
        kind: ConstraintKind,
        message: String,
    },
}

impl CheckError {
    /// Creates a new type mismatch error.
    pub fn type_mismatch(expected: FieldType, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Creates a new constraint violation error.
    pub fn violation(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self::Violation {
            kind,
            message: message.into(),
        }
    }
}
