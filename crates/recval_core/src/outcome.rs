//! Validation outcomes and record-level errors.

use crate::ConstraintKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Location of a value inside a record, from the root to the failing field.
///
/// Serialized as a JSON array of segments and displayed dotted (`address.city`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path, pointing at the record itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended by `segment`.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

/// Error taxonomy for record validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field absent
    Missing,
    /// Value has the wrong shape or type
    TypeError,
    /// Length, range, pattern or format check failed
    ConstraintViolation,
    /// Multi-field invariant failed
    CrossField,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::TypeError => "type_error",
            ErrorKind::ConstraintViolation => "constraint_violation",
            ErrorKind::CrossField => "cross_field",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured validation failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{path}: {message} ({kind})")]
pub struct ValidationError {
    /// Field names from the root to the failing field
    pub path: FieldPath,

    /// Failure category
    pub kind: ErrorKind,

    /// Specific constraint for `constraint_violation` errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<ConstraintKind>,

    /// Human-readable detail
    pub message: String,

    /// Echo of the offending input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl ValidationError {
    fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            constraint: None,
            message: message.into(),
            input: None,
        }
    }

    /// Creates a missing field error.
    pub fn missing(path: FieldPath) -> Self {
        Self::new(path, ErrorKind::Missing, "Field required")
    }

    /// Creates a type error.
    pub fn type_error(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::TypeError, message)
    }

    /// Creates a constraint violation error.
    pub fn constraint(path: FieldPath, kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            constraint: Some(kind),
            ..Self::new(path, ErrorKind::ConstraintViolation, message)
        }
    }

    /// Creates a cross-field rule error.
    pub fn cross_field(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::CrossField, message)
    }

    /// Attaches the offending input.
    pub fn with_input(mut self, input: Option<Value>) -> Self {
        self.input = input;
        self
    }
}

/// Result of validating one record.
///
/// Serializes to the normalized record when valid and to `{"errors": [...]}` otherwise.
/// Key order follows schema declaration order, so identical input always serializes
/// to identical text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Normalized record with every scalar coerced to its canonical type
    Valid(Map<String, Value>),

    /// Every failure, in evaluation order
    Invalid { errors: Vec<ValidationError> },
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid(_))
    }

    /// Returns the normalized record of a valid outcome.
    pub fn normalized(&self) -> Option<&Map<String, Value>> {
        match self {
            Outcome::Valid(record) => Some(record),
            Outcome::Invalid { .. } => None,
        }
    }

    /// Returns the errors of an invalid outcome (empty when valid).
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Outcome::Valid(_) => &[],
            Outcome::Invalid { errors } => errors,
        }
    }

    /// Serializes to a JSON value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Serializes to indented JSON text.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
