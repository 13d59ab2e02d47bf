//! Schema types and structures.
//!
//! This module contains the declarative description of a validatable record: field
//! types, field constraints, schema nodes and the cross-field rules attached to them.

use crate::{Result, SchemaError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Value type expected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Boolean
    Boolean,
    /// Nested object described by its own schema node
    Object,
}

impl FieldType {
    /// Returns the lowercase name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
        }
    }

    /// Returns true for integer and float fields.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a [`FieldConstraint`], used to identify failures programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    MinLength,
    MaxLength,
    Pattern,
    MinValue,
    MaxValue,
    RequiredFormat,
}

impl ConstraintKind {
    /// Returns the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::MinLength => "min_length",
            ConstraintKind::MaxLength => "max_length",
            ConstraintKind::Pattern => "pattern",
            ConstraintKind::MinValue => "min_value",
            ConstraintKind::MaxValue => "max_value",
            ConstraintKind::RequiredFormat => "required_format",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    /// `local-part@domain` with at least one dot in the domain
    Email,
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringFormat::Email => f.write_str("email"),
        }
    }
}

/// A regular expression that must match the whole input string.
///
/// The pattern is compiled once, when the schema is defined, and is serialized back
/// as the source text it was created from.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` anchored at both ends.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex =
            Regex::new(&format!("^(?:{source})$")).map_err(|e| SchemaError::InvalidPattern {
                pattern: source.clone(),
                error: e.to_string(),
            })?;
        Ok(Self { source, regex })
    }

    /// Returns the pattern as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the entire `value` matches.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl TryFrom<String> for Pattern {
    type Error = SchemaError;

    fn try_from(source: String) -> Result<Self> {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A single checkable rule over one scalar value.
///
/// The parameter type is fixed by the variant, so a constraint can never carry a
/// parameter of the wrong kind. Length bounds count Unicode scalar values and every
/// bound is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConstraint {
    /// String must have at least `value` characters
    MinLength {
        /// Minimum length (inclusive)
        value: usize,
    },

    /// String must have at most `value` characters
    MaxLength {
        /// Maximum length (inclusive)
        value: usize,
    },

    /// String must fully match the regex
    Pattern {
        /// Anchored regular expression
        regex: Pattern,
    },

    /// Number must be greater than or equal to `value`
    MinValue {
        /// Minimum value (inclusive)
        value: f64,
    },

    /// Number must be less than or equal to `value`
    MaxValue {
        /// Maximum value (inclusive)
        value: f64,
    },

    /// String must satisfy a well-known format
    RequiredFormat {
        /// Format to enforce
        format: StringFormat,
    },
}

impl FieldConstraint {
    /// Returns the kind of this constraint.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            FieldConstraint::MinLength { .. } => ConstraintKind::MinLength,
            FieldConstraint::MaxLength { .. } => ConstraintKind::MaxLength,
            FieldConstraint::Pattern { .. } => ConstraintKind::Pattern,
            FieldConstraint::MinValue { .. } => ConstraintKind::MinValue,
            FieldConstraint::MaxValue { .. } => ConstraintKind::MaxValue,
            FieldConstraint::RequiredFormat { .. } => ConstraintKind::RequiredFormat,
        }
    }

    /// Returns true if this constraint can be evaluated on values of `field_type`.
    pub fn applies_to(&self, field_type: FieldType) -> bool {
        match self {
            FieldConstraint::MinLength { .. }
            | FieldConstraint::MaxLength { .. }
            | FieldConstraint::Pattern { .. }
            | FieldConstraint::RequiredFormat { .. } => field_type == FieldType::String,
            FieldConstraint::MinValue { .. } | FieldConstraint::MaxValue { .. } => {
                field_type.is_numeric()
            }
        }
    }
}

fn default_required() -> bool {
    true
}

/// A single field definition in a schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name (key in the raw record)
    pub name: String,

    /// Expected value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field must be present
    #[serde(default = "default_required")]
    pub required: bool,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Constraints evaluated in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<FieldConstraint>,

    /// Child schema, present exactly when `field_type` is `object`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<SchemaNode>>,
}

/// A named, ordered definition of one validatable object shape.
///
/// # Example
///
/// ```rust
/// use recval_core::user_schema;
///
/// let user = user_schema().expect("built-in schema");
/// let names: Vec<_> = user.fields.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["name", "age", "email", "is_employed", "address"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Schema name (e.g. "User")
    pub name: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Field definitions in declaration order
    pub fields: Vec<FieldSpec>,

    /// Cross-field rules evaluated before per-field checks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<CrossFieldRule>,
}

impl SchemaNode {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates over non-object fields in declaration order.
    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(|f| f.field_type != FieldType::Object)
    }

    /// Iterates over object fields and their child schemas in declaration order.
    pub fn nested(&self) -> impl Iterator<Item = (&FieldSpec, &SchemaNode)> {
        self.fields
            .iter()
            .filter(|f| f.field_type == FieldType::Object)
            .filter_map(|f| f.schema.as_deref().map(|s| (f, s)))
    }

    /// Checks the definition itself, recursing into child schemas.
    ///
    /// Returns every problem found. An empty list means the schema is well-formed.
    pub fn validate_definition(&self) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                errors.push(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            errors.extend(self.validate_field_definition(field));
        }

        for rule in &self.rules {
            if let Some(applies_to) = &rule.applies_to {
                if applies_to != &self.name {
                    errors.push(SchemaError::RuleSchemaMismatch {
                        schema: self.name.clone(),
                        rule: rule.name.clone(),
                        applies_to: applies_to.clone(),
                    });
                }
            }
            if let RulePredicate::RangeWhen { field, min, max, .. } = &rule.predicate {
                if let Some(message) =
                    numeric_bounds_problem(("min", Some(*min)), ("max", Some(*max)))
                {
                    errors.push(SchemaError::InvalidBounds {
                        schema: self.name.clone(),
                        field: field.clone(),
                        message: format!("rule '{}': {}", rule.name, message),
                    });
                }
            }
            for referenced in rule.referenced_fields() {
                if self.field(referenced).is_none() {
                    errors.push(SchemaError::UnknownRuleField {
                        schema: self.name.clone(),
                        rule: rule.name.clone(),
                        field: referenced.to_string(),
                    });
                }
            }
        }

        errors
    }

    fn validate_field_definition(&self, field: &FieldSpec) -> Vec<SchemaError> {
        let mut errors = Vec::new();

        match (field.field_type, &field.schema) {
            (FieldType::Object, None) => errors.push(SchemaError::MissingNestedSchema {
                schema: self.name.clone(),
                field: field.name.clone(),
            }),
            (FieldType::Object, Some(child)) => errors.extend(child.validate_definition()),
            (field_type, Some(_)) => errors.push(SchemaError::UnexpectedNestedSchema {
                schema: self.name.clone(),
                field: field.name.clone(),
                field_type,
            }),
            (_, None) => {}
        }

        let mut min_length = None;
        let mut max_length = None;
        let mut min_value = None;
        let mut max_value = None;

        for constraint in &field.constraints {
            if !constraint.applies_to(field.field_type) {
                errors.push(SchemaError::InapplicableConstraint {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                    constraint: constraint.kind(),
                    field_type: field.field_type,
                });
            }
            match constraint {
                FieldConstraint::MinLength { value } => min_length = Some(*value),
                FieldConstraint::MaxLength { value } => max_length = Some(*value),
                FieldConstraint::MinValue { value } => min_value = Some(*value),
                FieldConstraint::MaxValue { value } => max_value = Some(*value),
                _ => {}
            }
        }

        if let (Some(min), Some(max)) = (min_length, max_length) {
            if min > max {
                errors.push(SchemaError::InvalidBounds {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                    message: format!("min_length {} exceeds max_length {}", min, max),
                });
            }
        }
        if let Some(message) =
            numeric_bounds_problem(("min_value", min_value), ("max_value", max_value))
        {
            errors.push(SchemaError::InvalidBounds {
                schema: self.name.clone(),
                field: field.name.clone(),
                message,
            });
        }

        errors
    }
}

/// Describes what is wrong with a pair of optional numeric bounds, if anything.
fn numeric_bounds_problem(
    (min_label, min): (&str, Option<f64>),
    (max_label, max): (&str, Option<f64>),
) -> Option<String> {
    for (label, bound) in [(min_label, min), (max_label, max)] {
        if let Some(value) = bound.filter(|v| !v.is_finite()) {
            return Some(format!("{} must be a finite number, got {}", label, value));
        }
    }
    match (min, max) {
        (Some(min), Some(max)) if min > max => Some(format!(
            "{} {} exceeds {} {}",
            min_label, min, max_label, max
        )),
        _ => None,
    }
}

/// Signature of a programmatic cross-field predicate.
///
/// Receives the raw (pre-coercion) record and returns true when the invariant holds.
pub type PredicateFn = dyn Fn(&Map<String, Value>) -> bool + Send + Sync;

/// Shared handle to a programmatic predicate.
#[derive(Clone)]
pub struct CustomPredicate(Arc<PredicateFn>);

impl CustomPredicate {
    /// Wraps a closure.
    pub fn new(predicate: impl Fn(&Map<String, Value>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Evaluates the predicate against a raw record.
    pub fn evaluate(&self, record: &Map<String, Value>) -> bool {
        (self.0)(record)
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPredicate(..)")
    }
}

impl PartialEq for CustomPredicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// The invariant checked by a [`CrossFieldRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RulePredicate {
    /// When boolean field `when` is true, numeric `field` must lie in `[min, max]`.
    ///
    /// A missing or non-coercible `when` or `field` leaves the rule untriggered.
    RangeWhen {
        when: String,
        field: String,
        min: f64,
        max: f64,
    },

    /// Arbitrary closure; only available when building schemas in code.
    #[serde(skip)]
    Custom(CustomPredicate),
}

/// A predicate over several fields of one schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossFieldRule {
    /// Rule identifier
    pub name: String,

    /// Name of the schema node this rule is registered on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<String>,

    /// Field the failure is reported against
    pub field: String,

    /// Failure message
    pub message: String,

    /// Invariant to check
    pub predicate: RulePredicate,
}

impl CrossFieldRule {
    /// Creates a conditional range rule reported against `field`.
    pub fn range_when(
        name: impl Into<String>,
        when: impl Into<String>,
        field: impl Into<String>,
        min: f64,
        max: f64,
        message: impl Into<String>,
    ) -> Self {
        let field = field.into();
        Self {
            name: name.into(),
            applies_to: None,
            field: field.clone(),
            message: message.into(),
            predicate: RulePredicate::RangeWhen {
                when: when.into(),
                field,
                min,
                max,
            },
        }
    }

    /// Creates a rule backed by a closure over the raw record.
    pub fn custom(
        name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            applies_to: None,
            field: field.into(),
            message: message.into(),
            predicate: RulePredicate::Custom(CustomPredicate::new(predicate)),
        }
    }

    /// Names of the fields this rule reads or reports against.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.field.as_str()];
        if let RulePredicate::RangeWhen { when, field, .. } = &self.predicate {
            fields.push(when.as_str());
            if field != &self.field {
                fields.push(field.as_str());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldBuilder, SchemaBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pattern_matches_whole_string() {
        let pattern = Pattern::new("[a-z]+").unwrap();
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("abc1"));
        assert!(!pattern.is_match("1abc"));
        assert_eq!(pattern.as_str(), "[a-z]+");
    }

    #[test]
    fn test_pattern_alternation_is_anchored() {
        let pattern = Pattern::new("ab|cd").unwrap();
        assert!(pattern.is_match("cd"));
        assert!(!pattern.is_match("abcd"));
        assert!(!pattern.is_match("xcd"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("[unclosed").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn test_constraint_serde_tagging() {
        let constraint: FieldConstraint =
            serde_json::from_str(r#"{"type": "min_length", "value": 2}"#).unwrap();
        assert_eq!(constraint, FieldConstraint::MinLength { value: 2 });

        let pattern: FieldConstraint =
            serde_json::from_str(r#"{"type": "pattern", "regex": "[0-9]+"}"#).unwrap();
        assert_eq!(pattern.kind(), ConstraintKind::Pattern);

        let bad = serde_json::from_str::<FieldConstraint>(r#"{"type": "pattern", "regex": "("}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_constraint_applicability() {
        let min_length = FieldConstraint::MinLength { value: 1 };
        assert!(min_length.applies_to(FieldType::String));
        assert!(!min_length.applies_to(FieldType::Integer));

        let max_value = FieldConstraint::MaxValue { value: 10.0 };
        assert!(max_value.applies_to(FieldType::Integer));
        assert!(max_value.applies_to(FieldType::Float));
        assert!(!max_value.applies_to(FieldType::Boolean));
    }

    #[test]
    fn test_duplicate_field_detected() {
        let node = SchemaNode {
            name: "Dup".to_string(),
            description: None,
            fields: vec![
                FieldBuilder::string("a").build(),
                FieldBuilder::integer("a").build(),
            ],
            rules: vec![],
        };

        let errors = node.validate_definition();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_inapplicable_constraint_and_bounds() {
        let node = SchemaNode {
            name: "Bad".to_string(),
            description: None,
            fields: vec![
                FieldBuilder::integer("count").min_length(2).build(),
                FieldBuilder::string("code")
                    .min_length(5)
                    .max_length(3)
                    .build(),
            ],
            rules: vec![],
        };

        let errors = node.validate_definition();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            SchemaError::InapplicableConstraint {
                constraint: ConstraintKind::MinLength,
                field_type: FieldType::Integer,
                ..
            }
        ));
        assert!(matches!(errors[1], SchemaError::InvalidBounds { .. }));
    }

    #[test]
    fn test_non_finite_value_bounds() {
        let node = SchemaNode {
            name: "Reading".to_string(),
            description: None,
            fields: vec![
                FieldBuilder::float("x").max_value(f64::NAN).build(),
                FieldBuilder::float("y").min_value(f64::NEG_INFINITY).build(),
                FieldBuilder::float("z").min_value(0.0).max_value(1.0).build(),
            ],
            rules: vec![],
        };

        let errors = node.validate_definition();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "Invalid bounds for field 'x' in schema 'Reading': max_value must be a finite number, got NaN"
        );
        assert!(matches!(
            &errors[1],
            SchemaError::InvalidBounds { field, .. } if field == "y"
        ));
    }

    #[test]
    fn test_rule_bounds_checked() {
        let fields = vec![
            FieldBuilder::integer("age").build(),
            FieldBuilder::boolean("is_employed").build(),
        ];
        let node = |min: f64, max: f64| SchemaNode {
            name: "Person".to_string(),
            description: None,
            fields: fields.clone(),
            rules: vec![CrossFieldRule::range_when(
                "employment",
                "is_employed",
                "age",
                min,
                max,
                "age out of range",
            )],
        };

        assert!(node(18.0, 65.0).validate_definition().is_empty());
        assert!(node(18.0, 18.0).validate_definition().is_empty());

        let inverted = node(65.0, 18.0).validate_definition();
        assert_eq!(inverted.len(), 1);
        assert_eq!(
            inverted[0].to_string(),
            "Invalid bounds for field 'age' in schema 'Person': rule 'employment': min 65 exceeds max 18"
        );

        let nan = node(f64::NAN, 65.0).validate_definition();
        assert!(matches!(nan[..], [SchemaError::InvalidBounds { .. }]));
    }

    #[test]
    fn test_object_field_requires_schema() {
        let node = SchemaNode {
            name: "Parent".to_string(),
            description: None,
            fields: vec![FieldBuilder::new("child", FieldType::Object).build()],
            rules: vec![],
        };

        let errors = node.validate_definition();
        assert!(matches!(errors[0], SchemaError::MissingNestedSchema { .. }));
    }

    #[test]
    fn test_rule_unknown_field() {
        let node = SchemaNode {
            name: "Person".to_string(),
            description: None,
            fields: vec![FieldBuilder::integer("age").build()],
            rules: vec![CrossFieldRule::range_when(
                "employment",
                "is_employed",
                "age",
                18.0,
                65.0,
                "age out of range",
            )],
        };

        let errors = node.validate_definition();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Rule 'employment' in schema 'Person' references unknown field 'is_employed'"
        );
    }

    #[test]
    fn test_nested_iteration_preserves_order() {
        let child = SchemaBuilder::new("Child")
            .field(FieldBuilder::string("x").build())
            .build()
            .unwrap();
        let parent = SchemaBuilder::new("Parent")
            .nested("first", child.clone())
            .field(FieldBuilder::string("scalar").build())
            .nested("second", child)
            .build()
            .unwrap();

        let nested: Vec<_> = parent.nested().map(|(f, _)| f.name.as_str()).collect();
        assert_eq!(nested, ["first", "second"]);

        let scalars: Vec<_> = parent.scalar_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(scalars, ["scalar"]);
    }

    #[test]
    fn test_custom_predicate_equality_is_identity() {
        let predicate = CustomPredicate::new(|_| true);
        assert_eq!(predicate, predicate.clone());
        assert_ne!(predicate, CustomPredicate::new(|_| true));
    }
}
