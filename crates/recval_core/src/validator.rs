//! Validation traits and types for records.
//!
//! This module defines the core trait for implementing record validators and the
//! options that tune how raw values are accepted.

use crate::{FieldPath, Outcome, SchemaNode};
use serde_json::Value;

/// Core trait for validating records against a schema.
///
/// Validation is a pure function of `(schema, record)`: implementations hold no
/// per-call state, so one validator can serve any number of concurrent callers.
///
/// # Example
///
/// ```rust
/// use recval_core::{FieldPath, Outcome, RecordValidator, SchemaNode};
/// use serde_json::Value;
///
/// struct AcceptAll;
///
/// impl RecordValidator for AcceptAll {
///     fn validate(&self, _node: &SchemaNode, record: &Value, _prefix: &FieldPath) -> Outcome {
///         Outcome::Valid(record.as_object().cloned().unwrap_or_default())
///     }
/// }
/// ```
pub trait RecordValidator: Send + Sync {
    /// Validates `record` against `node`.
    ///
    /// Every reported error path starts with `prefix`. Malformed input never
    /// escapes as a fault; it is reported inside the returned [`Outcome`].
    fn validate(&self, node: &SchemaNode, record: &Value, prefix: &FieldPath) -> Outcome;

    /// Validates a top-level record.
    fn validate_record(&self, node: &SchemaNode, record: &Value) -> Outcome {
        self.validate(node, record, &FieldPath::root())
    }
}

/// Options for validation operations.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Accept only exact JSON types (no string-to-number or string-to-bool coercion)
    pub strict: bool,

    /// Echo offending input values into errors
    pub include_input: bool,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            strict: false,
            include_input: true,
        }
    }
}

impl ValidationContext {
    /// Creates a new validation context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets strict validation mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets whether offending values are echoed into errors.
    pub fn with_include_input(mut self, include_input: bool) -> Self {
        self.include_input = include_input;
        self
    }
}
