//! Builder pattern for creating schemas.
//!
//! This module provides ergonomic builders for constructing schema nodes
//! and their fields with a fluent API.

use crate::{
    CrossFieldRule, FieldConstraint, FieldSpec, FieldType, Pattern, Result, SchemaNode,
    StringFormat,
};

/// Builder for creating a `SchemaNode`.
///
/// # Example
///
/// ```rust
/// use recval_core::{FieldBuilder, SchemaBuilder};
///
/// let schema = SchemaBuilder::new("Address")
///     .description("Postal address")
///     .field(FieldBuilder::string("city").min_length(2).build())
///     .field(FieldBuilder::string("street").min_length(3).build())
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.name, "Address");
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    rules: Vec<CrossFieldRule>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the schema description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Adds a required object field validated by `schema`.
    pub fn nested(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            field_type: FieldType::Object,
            required: true,
            description: None,
            constraints: Vec::new(),
            schema: Some(Box::new(schema)),
        });
        self
    }

    /// Registers a cross-field rule on this schema.
    pub fn rule(mut self, mut rule: CrossFieldRule) -> Self {
        rule.applies_to.get_or_insert_with(|| self.name.clone());
        self.rules.push(rule);
        self
    }

    /// Builds the schema node.
    ///
    /// # Errors
    ///
    /// Returns the first problem reported by [`SchemaNode::validate_definition`].
    pub fn build(self) -> Result<SchemaNode> {
        let node = SchemaNode {
            name: self.name,
            description: self.description,
            fields: self.fields,
            rules: self.rules,
        };

        match node.validate_definition().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(node),
        }
    }
}

/// Builder for creating a `FieldSpec`.
///
/// # Example
///
/// ```rust
/// use recval_core::{FieldBuilder, FieldType};
///
/// let field = FieldBuilder::integer("age")
///     .description("Age in years")
///     .min_value(0.0)
///     .max_value(65.0)
///     .build();
///
/// assert_eq!(field.field_type, FieldType::Integer);
/// assert_eq!(field.constraints.len(), 2);
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    required: bool,
    description: Option<String>,
    constraints: Vec<FieldConstraint>,
}

impl FieldBuilder {
    /// Creates a new required field builder.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            description: None,
            constraints: Vec::new(),
        }
    }

    /// Shorthand for a string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Shorthand for an integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Shorthand for a float field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    /// Shorthand for a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Sets whether the field must be present.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a constraint to the field.
    pub fn constraint(mut self, constraint: FieldConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn min_length(self, value: usize) -> Self {
        self.constraint(FieldConstraint::MinLength { value })
    }

    pub fn max_length(self, value: usize) -> Self {
        self.constraint(FieldConstraint::MaxLength { value })
    }

    pub fn pattern(self, regex: Pattern) -> Self {
        self.constraint(FieldConstraint::Pattern { regex })
    }

    pub fn min_value(self, value: f64) -> Self {
        self.constraint(FieldConstraint::MinValue { value })
    }

    pub fn max_value(self, value: f64) -> Self {
        self.constraint(FieldConstraint::MaxValue { value })
    }

    pub fn email(self) -> Self {
        self.constraint(FieldConstraint::RequiredFormat {
            format: StringFormat::Email,
        })
    }

    /// Builds the field.
    pub fn build(self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            field_type: self.field_type,
            required: self.required,
            description: self.description,
            constraints: self.constraints,
            schema: None,
        }
    }
}
