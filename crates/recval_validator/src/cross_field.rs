//! Cross-field rule evaluation.
//!
//! Rules run before any per-field check and see the raw, pre-coercion values,
//! read as leniently as the per-field pass reads them (exact JSON types in strict
//! mode). A rule whose inputs are missing or unreadable is treated as not
//! triggered: reporting those fields is left to the per-field pass.

use crate::{lax_bool, lax_number};
use recval_core::{
    CrossFieldRule, FieldPath, RulePredicate, SchemaNode, ValidationContext, ValidationError,
};
use serde_json::{Map, Value};
use tracing::trace;

/// Evaluates the cross-field rules registered on a schema node.
pub struct CrossFieldValidator;

impl CrossFieldValidator {
    /// Creates a new cross-field validator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates every rule of `node` against `record`.
    ///
    /// Returns one error per failed rule, in rule declaration order.
    pub fn validate(
        &self,
        node: &SchemaNode,
        record: &Map<String, Value>,
        prefix: &FieldPath,
        context: &ValidationContext,
    ) -> Vec<ValidationError> {
        node.rules
            .iter()
            .filter(|rule| !self.is_satisfied(rule, record, context.strict))
            .map(|rule| {
                trace!(schema = %node.name, rule = %rule.name, "cross-field rule failed");
                let input = if context.include_input {
                    record.get(&rule.field).cloned()
                } else {
                    None
                };
                ValidationError::cross_field(prefix.child(&rule.field), &rule.message)
                    .with_input(input)
            })
            .collect()
    }

    /// Returns true when the rule holds or is not triggered.
    pub fn is_satisfied(
        &self,
        rule: &CrossFieldRule,
        record: &Map<String, Value>,
        strict: bool,
    ) -> bool {
        let read_bool = |value: &Value| if strict { value.as_bool() } else { lax_bool(value) };
        let read_number = |value: &Value| {
            if strict {
                value.as_f64()
            } else {
                lax_number(value)
            }
        };

        match &rule.predicate {
            RulePredicate::RangeWhen {
                when,
                field,
                min,
                max,
            } => {
                let triggered = record.get(when).and_then(read_bool).unwrap_or(false);
                if !triggered {
                    return true;
                }
                match record.get(field).and_then(read_number) {
                    Some(value) => value >= *min && value <= *max,
                    None => true,
                }
            }
            RulePredicate::Custom(predicate) => predicate.evaluate(record),
        }
    }
}

impl Default for CrossFieldValidator {
    fn default() -> Self {
        Self::new()
    }
}
