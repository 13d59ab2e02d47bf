//! Parser for declarative record schemas (YAML/TOML formats).
//!
//! This module provides functionality to parse schema definitions from YAML and TOML
//! files into the strongly-typed `SchemaNode` structure. Parsed schemas are checked
//! with [`SchemaNode::validate_definition`] before being returned.
//!
//! Cross-field rules can be declared with the `range_when` predicate; closure-backed
//! rules are only available when building schemas in code.
//!
//! # Example
//!
//! ```rust
//! use recval_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: Address
//! fields:
//!   - name: city
//!     type: string
//!     constraints:
//!       - type: min_length
//!         value: 2
//!   - name: house_number
//!     type: integer
//!     constraints:
//!       - type: min_value
//!         value: 1
//! "#;
//!
//! let schema = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(schema.name, "Address");
//! ```

use recval_core::{SchemaError, SchemaNode};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during schema parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Schema parsed but is not well-formed
    #[error("Invalid schema definition: {0}")]
    Definition(#[from] SchemaError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

fn checked(schema: SchemaNode) -> Result<SchemaNode> {
    match schema.validate_definition().into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(schema),
    }
}

/// Parse a schema from a YAML string.
///
/// # Example
///
/// ```rust
/// use recval_parser::parse_yaml;
///
/// let yaml = r#"
/// name: Flag
/// fields:
///   - name: enabled
///     type: boolean
/// "#;
///
/// let schema = parse_yaml(yaml).unwrap();
/// assert_eq!(schema.fields.len(), 1);
/// ```
pub fn parse_yaml(content: &str) -> Result<SchemaNode> {
    let schema: SchemaNode = serde_yaml_ng::from_str(content)?;
    checked(schema)
}

/// Parse a schema from a TOML string.
///
/// # Example
///
/// ```rust
/// use recval_parser::parse_toml;
///
/// let toml = r#"
/// name = "Flag"
///
/// [[fields]]
/// name = "enabled"
/// type = "boolean"
/// "#;
///
/// let schema = parse_toml(toml).unwrap();
/// assert_eq!(schema.name, "Flag");
/// ```
pub fn parse_toml(content: &str) -> Result<SchemaNode> {
    let schema: SchemaNode =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    checked(schema)
}

/// Detect the schema format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SchemaFormat::Yaml`
/// * `.toml` → `SchemaFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema from a file with automatic format detection.
///
/// ```no_run
/// use recval_parser::parse_file;
/// use std::path::Path;
///
/// let schema = parse_file(Path::new("schemas/user.yml")).unwrap();
/// println!("Loaded schema: {}", schema.name);
/// ```
pub fn parse_file(path: &Path) -> Result<SchemaNode> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        SchemaFormat::Yaml => parse_yaml(&content),
        SchemaFormat::Toml => parse_toml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recval_core::{FieldConstraint, FieldType, RulePredicate, StringFormat};

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let yaml = r#"
name: Empty
fields: []
"#;
        let schema = parse_yaml(yaml).unwrap();
        assert_eq!(schema.name, "Empty");
        assert!(schema.fields.is_empty());
        assert!(schema.rules.is_empty());
    }

    #[test]
    fn test_parse_yaml_defaults() {
        let yaml = r#"
name: Person
fields:
  - name: nickname
    type: string
  - name: email
    type: string
    required: false
    constraints:
      - type: required_format
        format: email
"#;
        let schema = parse_yaml(yaml).unwrap();
        assert!(schema.fields[0].required);
        assert!(!schema.fields[1].required);
        assert_eq!(
            schema.fields[1].constraints,
            [FieldConstraint::RequiredFormat {
                format: StringFormat::Email
            }]
        );
    }

    #[test]
    fn test_parse_yaml_nested_and_rules() {
        let yaml = r#"
name: Order
fields:
  - name: express
    type: boolean
  - name: weight
    type: float
  - name: destination
    type: object
    schema:
      name: Destination
      fields:
        - name: zip
          type: string
          constraints:
            - type: pattern
              regex: '[0-9]{5}'
rules:
  - name: express_weight
    field: weight
    message: express parcels must weigh at most 5 kg
    predicate:
      type: range_when
      when: express
      field: weight
      min: 0
      max: 5.0
"#;
        let schema = parse_yaml(yaml).unwrap();

        let (field, child) = schema.nested().next().unwrap();
        assert_eq!(field.name, "destination");
        assert_eq!(child.fields[0].field_type, FieldType::String);

        assert_eq!(
            schema.rules[0].predicate,
            RulePredicate::RangeWhen {
                when: "express".to_string(),
                field: "weight".to_string(),
                min: 0.0,
                max: 5.0,
            }
        );
    }

    #[test]
    fn test_parse_yaml_invalid_regex() {
        let yaml = r#"
name: Bad
fields:
  - name: code
    type: string
    constraints:
      - type: pattern
        regex: '[unclosed'
"#;
        assert!(matches!(parse_yaml(yaml), Err(ParserError::YamlError(_))));
    }

    #[test]
    fn test_parse_yaml_definition_error() {
        let yaml = r#"
name: Bad
fields:
  - name: count
    type: integer
    constraints:
      - type: max_length
        value: 3
"#;
        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(SchemaError::InapplicableConstraint { .. })
        ));
    }

    #[test]
    fn test_parse_yaml_nan_bound_rejected() {
        let yaml = r#"
name: Reading
fields:
  - name: x
    type: float
    constraints:
      - type: max_value
        value: .nan
"#;
        assert!(matches!(
            parse_yaml(yaml),
            Err(ParserError::Definition(SchemaError::InvalidBounds { .. }))
        ));
    }

    #[test]
    fn test_parse_yaml_inverted_rule_range() {
        let yaml = r#"
name: Person
fields:
  - name: age
    type: integer
  - name: is_employed
    type: boolean
rules:
  - name: employment_age
    field: age
    message: age must be between 18 and 65 years
    predicate:
      type: range_when
      when: is_employed
      field: age
      min: 65
      max: 18
"#;
        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(SchemaError::InvalidBounds { ref field, .. }) if field == "age"
        ));
    }

    #[test]
    fn test_parse_yaml_unknown_type() {
        let yaml = r#"
name: Bad
fields:
  - name: when
    type: timestamp
"#;
        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_yaml_rejects_custom_rule() {
        let yaml = r#"
name: Bad
fields:
  - name: a
    type: integer
rules:
  - name: r
    field: a
    message: m
    predicate:
      type: custom
"#;
        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml = r#"
name = "Address"

[[fields]]
name = "city"
type = "string"
constraints = [{ type = "min_length", value = 2 }]

[[fields]]
name = "house_number"
type = "integer"
constraints = [{ type = "min_value", value = 1 }]
"#;
        let schema = parse_toml(toml).unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(
            schema.fields[1].constraints,
            [FieldConstraint::MinValue { value: 1.0 }]
        );
    }

    #[test]
    fn test_parse_toml_duplicate_field() {
        let toml = r#"
name = "Dup"

[[fields]]
name = "a"
type = "string"

[[fields]]
name = "a"
type = "string"
"#;
        assert!(matches!(
            parse_toml(toml),
            Err(ParserError::Definition(SchemaError::DuplicateField { .. }))
        ));
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(matches!(
            parse_toml("name = "),
            Err(ParserError::TomlError(_))
        ));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("user.yml")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("user.YAML")).unwrap(),
            SchemaFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("user.toml")).unwrap(),
            SchemaFormat::Toml
        );
        assert!(matches!(
            detect_format(Path::new("user.json")),
            Err(ParserError::UnsupportedFormat(ext)) if ext == "json"
        ));
        assert!(matches!(
            detect_format(Path::new("user")),
            Err(ParserError::InvalidExtension)
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file(Path::new("/definitely/not/here.yml")),
            Err(ParserError::IoError(_))
        ));
    }
}
