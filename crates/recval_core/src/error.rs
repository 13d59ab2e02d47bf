//! Error types for schema definitions.
//!
//! These errors describe problems with a schema itself (duplicate fields, invalid
//! patterns, inapplicable constraints). Problems with a *record* are never errors in
//! this sense: they are reported as [`ValidationError`](crate::ValidationError) values
//! inside an [`Outcome`](crate::Outcome).

use crate::{ConstraintKind, FieldType};
use thiserror::Error;

/// Result type for schema definition operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Main error type for schema definition problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Regular expression failed to compile
    #[error("Invalid regex pattern '{pattern}': {error}")]
    InvalidPattern {
        /// Pattern source as written in the schema
        pattern: String,
        /// Compiler error
        error: String,
    },

    /// Two fields share a name within one schema node
    #[error("Duplicate field '{field}' in schema '{schema}'")]
    DuplicateField {
        /// Schema node name
        schema: String,
        /// Repeated field name
        field: String,
    },

    /// Object field declared without a nested schema
    #[error("Object field '{field}' in schema '{schema}' has no nested schema")]
    MissingNestedSchema {
        /// Schema node name
        schema: String,
        /// Field name
        field: String,
    },

    /// Scalar field declared with a nested schema
    #[error("Field '{field}' in schema '{schema}' has type {field_type} and cannot carry a nested schema")]
    UnexpectedNestedSchema {
        /// Schema node name
        schema: String,
        /// Field name
        field: String,
        /// Declared type
        field_type: FieldType,
    },

    /// Constraint kind does not apply to the field's type
    #[error("Constraint {constraint} is not applicable to {field_type} field '{field}' in schema '{schema}'")]
    InapplicableConstraint {
        /// Schema node name
        schema: String,
        /// Field name
        field: String,
        /// Offending constraint
        constraint: ConstraintKind,
        /// Declared type
        field_type: FieldType,
    },

    /// Lower bound exceeds upper bound
    #[error("Invalid bounds for field '{field}' in schema '{schema}': {message}")]
    InvalidBounds {
        /// Schema node name
        schema: String,
        /// Field name
        field: String,
        /// Details
        message: String,
    },

    /// Cross-field rule mentions a field the schema does not declare
    #[error("Rule '{rule}' in schema '{schema}' references unknown field '{field}'")]
    UnknownRuleField {
        /// Schema node name
        schema: String,
        /// Rule name
        rule: String,
        /// Unknown field
        field: String,
    },

    /// Cross-field rule registered on a different schema node
    #[error("Rule '{rule}' applies to schema '{applies_to}' but is attached to '{schema}'")]
    RuleSchemaMismatch {
        /// Schema node name
        schema: String,
        /// Rule name
        rule: String,
        /// Node the rule declares it applies to
        applies_to: String,
    },
}
