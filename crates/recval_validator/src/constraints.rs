//! Constraint validation logic.
//!
//! This module evaluates a single [`FieldConstraint`] against an already coerced
//! value:
//! - MinLength / MaxLength: character count (Unicode scalar values) within bounds
//! - Pattern: string must fully match the regex
//! - MinValue / MaxValue: inclusive numeric bounds
//! - RequiredFormat: string must satisfy a well-known format (email)

use crate::CheckError;
use recval_core::{ConstraintKind, FieldConstraint, FieldType, StringFormat};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Email grammar accepted by the `email` format.
///
/// Local part: dot-separated atoms of RFC 5322 atext. Domain: at least two
/// dot-separated labels of letters, digits and inner hyphens. No DNS lookup.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// A checkable rule over one value.
pub trait Check {
    /// Returns `Ok(())` when `value` satisfies the rule.
    fn check(&self, value: &Value) -> Result<(), CheckError>;
}

impl Check for FieldConstraint {
    fn check(&self, value: &Value) -> Result<(), CheckError> {
        match self {
            FieldConstraint::MinLength { value: min } => {
                let len = char_count(value)?;
                if len < *min {
                    return Err(CheckError::violation(
                        ConstraintKind::MinLength,
                        format!("String should have at least {} characters", min),
                    ));
                }
                Ok(())
            }
            FieldConstraint::MaxLength { value: max } => {
                let len = char_count(value)?;
                if len > *max {
                    return Err(CheckError::violation(
                        ConstraintKind::MaxLength,
                        format!("String should have at most {} characters", max),
                    ));
                }
                Ok(())
            }
            FieldConstraint::Pattern { regex } => {
                if !regex.is_match(as_str(value)?) {
                    return Err(CheckError::violation(
                        ConstraintKind::Pattern,
                        format!("String should match pattern '{}'", regex.as_str()),
                    ));
                }
                Ok(())
            }
            FieldConstraint::MinValue { value: min } => {
                if as_number(value)? < *min {
                    return Err(CheckError::violation(
                        ConstraintKind::MinValue,
                        format!("Input should be greater than or equal to {}", min),
                    ));
                }
                Ok(())
            }
            FieldConstraint::MaxValue { value: max } => {
                if as_number(value)? > *max {
                    return Err(CheckError::violation(
                        ConstraintKind::MaxValue,
                        format!("Input should be less than or equal to {}", max),
                    ));
                }
                Ok(())
            }
            FieldConstraint::RequiredFormat { format } => check_format(*format, as_str(value)?),
        }
    }
}

fn as_str(value: &Value) -> Result<&str, CheckError> {
    value
        .as_str()
        .ok_or_else(|| CheckError::type_mismatch(FieldType::String, crate::json_type_name(value)))
}

fn char_count(value: &Value) -> Result<usize, CheckError> {
    as_str(value).map(|s| s.chars().count())
}

fn as_number(value: &Value) -> Result<f64, CheckError> {
    value
        .as_f64()
        .ok_or_else(|| CheckError::type_mismatch(FieldType::Float, crate::json_type_name(value)))
}

fn check_format(format: StringFormat, value: &str) -> Result<(), CheckError> {
    match format {
        StringFormat::Email => {
            if EMAIL_REGEX.is_match(value) {
                return Ok(());
            }
            Err(CheckError::violation(
                ConstraintKind::RequiredFormat,
                format!(
                    "value is not a valid email address: {}",
                    email_problem(value)
                ),
            ))
        }
    }
}

/// Best-effort explanation of why `value` is not an email address.
fn email_problem(value: &str) -> &'static str {
    match value.rsplit_once('@') {
        None => "An email address must have an @-sign",
        Some(("", _)) => "There must be something before the @-sign",
        Some((_, domain)) if !domain.contains('.') => {
            "The part after the @-sign is not valid. It should have a period"
        }
        Some((local, _)) if local.contains('@') => "An email address must have exactly one @-sign",
        Some(_) => "The email address contains invalid characters or structure",
    }
}
