//! Main validation engine.
//!
//! This module provides the `ValidationEngine` that orchestrates all checks for one
//! record: cross-field rules, per-field presence, type coercion and constraints, and
//! recursion into nested schema nodes.

use crate::{Check, CheckError, CrossFieldValidator, coerce, json_type_name};
use recval_core::{
    FieldPath, FieldSpec, FieldType, Outcome, RecordValidator, SchemaNode, ValidationContext,
    ValidationError,
};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Main validation engine for records.
///
/// Aggregates every failure instead of stopping at the first one. Errors are
/// ordered: cross-field failures of a node, then its per-field failures in
/// declaration order, then the failures of its nested nodes in declaration order.
///
/// # Example
///
/// ```rust
/// use recval_core::{address_schema, ErrorKind, RecordValidator};
/// use recval_validator::ValidationEngine;
/// use serde_json::json;
///
/// let schema = address_schema().unwrap();
/// let engine = ValidationEngine::new();
///
/// let outcome = engine.validate_record(&schema, &json!({"city": "Ы", "street": "Ленина"}));
///
/// for error in outcome.errors() {
///     println!("Error: {}", error);
/// }
/// assert_eq!(outcome.errors().len(), 2);
/// assert_eq!(outcome.errors()[1].kind, ErrorKind::Missing);
/// ```
pub struct ValidationEngine {
    context: ValidationContext,
    cross_field: CrossFieldValidator,
}

impl ValidationEngine {
    /// Creates a new engine with default (lax) settings.
    pub fn new() -> Self {
        Self::with_context(ValidationContext::default())
    }

    /// Creates a new engine with the given options.
    pub fn with_context(context: ValidationContext) -> Self {
        Self {
            context,
            cross_field: CrossFieldValidator::new(),
        }
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Validates a record given as JSON text.
    ///
    /// Text that is not valid JSON yields a single root-level `type_error`.
    pub fn validate_json(&self, node: &SchemaNode, json: &str) -> Outcome {
        match serde_json::from_str::<Value>(json) {
            Ok(record) => self.validate_record(node, &record),
            Err(e) => Outcome::Invalid {
                errors: vec![ValidationError::type_error(
                    FieldPath::root(),
                    format!("Invalid JSON: {}", e),
                )],
            },
        }
    }

    /// Validates one object against `node`, appending failures to `errors`.
    ///
    /// Returns the normalized object when this subtree produced no errors.
    fn validate_node(
        &self,
        node: &SchemaNode,
        value: &Value,
        path: &FieldPath,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Map<String, Value>> {
        let Some(record) = value.as_object() else {
            errors.push(
                ValidationError::type_error(
                    path.clone(),
                    format!(
                        "Input should be a valid object for schema '{}', got {}",
                        node.name,
                        json_type_name(value)
                    ),
                )
                .with_input(self.echo(value)),
            );
            return None;
        };

        let before = errors.len();

        // 1. Cross-field rules on raw values
        errors.extend(self.cross_field.validate(node, record, path, &self.context));

        let mut values: Vec<Option<Value>> = vec![None; node.fields.len()];

        // 2. Scalar fields
        for (idx, field) in node.fields.iter().enumerate() {
            if field.field_type != FieldType::Object {
                values[idx] = self.validate_scalar(
                    field,
                    record.get(&field.name),
                    &path.child(&field.name),
                    errors,
                );
            }
        }

        // 3. Nested objects
        for (idx, field) in node.fields.iter().enumerate() {
            if let Some(child) = field.schema.as_deref() {
                values[idx] = self.validate_nested(
                    field,
                    child,
                    record.get(&field.name),
                    &path.child(&field.name),
                    errors,
                );
            }
        }

        if errors.len() > before {
            return None;
        }

        Some(
            node.fields
                .iter()
                .zip(values)
                .filter_map(|(field, value)| value.map(|v| (field.name.clone(), v)))
                .collect(),
        )
    }

    fn validate_scalar(
        &self,
        field: &FieldSpec,
        raw: Option<&Value>,
        path: &FieldPath,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Value> {
        let Some(raw) = raw else {
            if field.required {
                errors.push(ValidationError::missing(path.clone()));
            }
            return None;
        };

        let value = match coerce(raw, field.field_type, self.context.strict) {
            Ok(value) => value,
            Err(err) => {
                errors.push(self.check_failure(path, err, raw));
                return None;
            }
        };

        let before = errors.len();
        for constraint in &field.constraints {
            if let Err(err) = constraint.check(&value) {
                trace!(field = %path, constraint = %constraint.kind(), "constraint failed");
                errors.push(self.check_failure(path, err, raw));
            }
        }

        (errors.len() == before).then_some(value)
    }

    fn validate_nested(
        &self,
        field: &FieldSpec,
        child: &SchemaNode,
        raw: Option<&Value>,
        path: &FieldPath,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Value> {
        let Some(raw) = raw else {
            if field.required {
                errors.push(ValidationError::missing(path.clone()));
            }
            return None;
        };

        self.validate_node(child, raw, path, errors).map(Value::Object)
    }

    fn check_failure(&self, path: &FieldPath, err: CheckError, raw: &Value) -> ValidationError {
        let error = match &err {
            CheckError::TypeMismatch { .. } => {
                ValidationError::type_error(path.clone(), err.to_string())
            }
            CheckError::Violation { kind, message } => {
                ValidationError::constraint(path.clone(), *kind, message)
            }
        };
        error.with_input(self.echo(raw))
    }

    fn echo(&self, raw: &Value) -> Option<Value> {
        self.context.include_input.then(|| raw.clone())
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordValidator for ValidationEngine {
    fn validate(&self, node: &SchemaNode, record: &Value, prefix: &FieldPath) -> Outcome {
        let mut errors = Vec::new();
        let normalized = self.validate_node(node, record, prefix, &mut errors);

        match normalized {
            Some(record) if errors.is_empty() => {
                debug!("Record passed validation against '{}'", node.name);
                Outcome::Valid(record)
            }
            _ => {
                debug!(
                    "Record failed validation against '{}': {} error(s)",
                    node.name,
                    errors.len()
                );
                Outcome::Invalid { errors }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recval_core::{
        ConstraintKind, ErrorKind, FieldBuilder, SchemaBuilder, address_schema, user_schema,
    };
    use serde_json::json;

    fn valid_user() -> Value {
        json!({
            "name": "Сергей Петров",
            "age": 50,
            "email": "sergey.petrov@gmail.com",
            "is_employed": true,
            "address": {
                "city": "Новосибирск",
                "street": "Ленина",
                "house_number": 56
            }
        })
    }

    fn kinds(outcome: &Outcome) -> Vec<(String, ErrorKind)> {
        outcome
            .errors()
            .iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect()
    }

    #[test]
    fn test_valid_record() {
        let schema = user_schema().unwrap();
        let outcome = ValidationEngine::new().validate_record(&schema, &valid_user());
        assert!(outcome.is_valid(), "Expected pass, got errors: {:?}", outcome.errors());
    }

    #[test]
    fn test_normalized_key_order_follows_schema() {
        let schema = user_schema().unwrap();
        let record = json!({
            "address": {"house_number": 1, "street": "Мира", "city": "Киев"},
            "is_employed": false,
            "email": "x@y.ru",
            "age": 30,
            "name": "Ян",
            "nickname": "ignored"
        });

        let outcome = ValidationEngine::new().validate_record(&schema, &record);
        let normalized = outcome.normalized().unwrap();

        let keys: Vec<_> = normalized.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "age", "email", "is_employed", "address"]);

        let address_keys: Vec<_> = normalized["address"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(address_keys, ["city", "street", "house_number"]);
    }

    #[test]
    fn test_lax_coercion_normalizes() {
        let schema = user_schema().unwrap();
        let mut record = valid_user();
        record["age"] = json!("50");
        record["is_employed"] = json!("yes");

        let outcome = ValidationEngine::new().validate_record(&schema, &record);
        let normalized = outcome.normalized().unwrap();
        assert_eq!(normalized["age"], json!(50));
        assert_eq!(normalized["is_employed"], json!(true));
    }

    #[test]
    fn test_strict_mode_rejects_strings() {
        let schema = user_schema().unwrap();
        let mut record = valid_user();
        record["age"] = json!("50");

        let engine = ValidationEngine::with_context(ValidationContext::new().with_strict(true));
        let outcome = engine.validate_record(&schema, &record);

        assert_eq!(kinds(&outcome), [("age".to_string(), ErrorKind::TypeError)]);
        assert_eq!(
            outcome.errors()[0].message,
            "Input should be a valid integer, got string"
        );
    }

    #[test]
    fn test_all_failures_within_a_field_are_collected() {
        let schema = SchemaBuilder::new("Code")
            .field(
                FieldBuilder::string("code")
                    .min_length(5)
                    .pattern(recval_core::Pattern::new("[A-Z]+").unwrap())
                    .build(),
            )
            .build()
            .unwrap();

        let outcome = ValidationEngine::new().validate_record(&schema, &json!({"code": "ab"}));
        let constraints: Vec<_> = outcome.errors().iter().map(|e| e.constraint).collect();
        assert_eq!(
            constraints,
            [Some(ConstraintKind::MinLength), Some(ConstraintKind::Pattern)]
        );
    }

    #[test]
    fn test_error_order_cross_field_then_fields_then_nested() {
        let schema = user_schema().unwrap();
        let record = json!({
            "name": "X",
            "age": 70,
            "email": "nope",
            "is_employed": true,
            "address": {"city": "Ы", "street": "Ул", "house_number": 0}
        });

        let outcome = ValidationEngine::new().validate_record(&schema, &record);
        assert_eq!(
            kinds(&outcome),
            [
                ("age".to_string(), ErrorKind::CrossField),
                ("name".to_string(), ErrorKind::ConstraintViolation),
                ("age".to_string(), ErrorKind::ConstraintViolation),
                ("email".to_string(), ErrorKind::ConstraintViolation),
                ("address.city".to_string(), ErrorKind::ConstraintViolation),
                ("address.street".to_string(), ErrorKind::ConstraintViolation),
                ("address.house_number".to_string(), ErrorKind::ConstraintViolation),
            ]
        );
    }

    #[test]
    fn test_prefix_is_applied() {
        let schema = address_schema().unwrap();
        let prefix = FieldPath::root().child("shipping");
        let outcome = ValidationEngine::new().validate(
            &schema,
            &json!({"city": "Рим", "street": "Via", "house_number": -3}),
            &prefix,
        );

        assert_eq!(
            outcome.errors()[0].path.segments(),
            ["shipping", "house_number"]
        );
    }

    #[test]
    fn test_non_object_record() {
        let schema = user_schema().unwrap();
        let outcome = ValidationEngine::new().validate_record(&schema, &json!([1, 2, 3]));

        assert_eq!(kinds(&outcome), [("<root>".to_string(), ErrorKind::TypeError)]);
        assert!(outcome.errors()[0].path.is_root());
    }

    #[test]
    fn test_nested_not_an_object() {
        let schema = user_schema().unwrap();
        let mut record = valid_user();
        record["address"] = json!("Ленина 56");

        let outcome = ValidationEngine::new().validate_record(&schema, &record);
        assert_eq!(kinds(&outcome), [("address".to_string(), ErrorKind::TypeError)]);
    }

    #[test]
    fn test_optional_field_omitted() {
        let schema = SchemaBuilder::new("Profile")
            .field(FieldBuilder::string("login").build())
            .field(FieldBuilder::string("bio").required(false).min_length(1).build())
            .build()
            .unwrap();

        let outcome = ValidationEngine::new().validate_record(&schema, &json!({"login": "ivan"}));
        assert_eq!(outcome.normalized().unwrap().len(), 1);

        let outcome = ValidationEngine::new().validate_record(&schema, &json!({"bio": ""}));
        assert_eq!(
            kinds(&outcome),
            [
                ("login".to_string(), ErrorKind::Missing),
                ("bio".to_string(), ErrorKind::ConstraintViolation),
            ]
        );
    }

    #[test]
    fn test_include_input_toggle() {
        let schema = address_schema().unwrap();
        let record = json!({"city": "Ы", "street": "Ленина", "house_number": 1});

        let echoed = ValidationEngine::new().validate_record(&schema, &record);
        assert_eq!(echoed.errors()[0].input, Some(json!("Ы")));

        let engine =
            ValidationEngine::with_context(ValidationContext::new().with_include_input(false));
        let quiet = engine.validate_record(&schema, &record);
        assert_eq!(quiet.errors()[0].input, None);
    }

    #[test]
    fn test_validate_json_invalid_text() {
        let schema = user_schema().unwrap();
        let outcome = ValidationEngine::new().validate_json(&schema, "{not json");

        assert_eq!(kinds(&outcome), [("<root>".to_string(), ErrorKind::TypeError)]);
        assert!(outcome.errors()[0].message.starts_with("Invalid JSON"));
    }
}
