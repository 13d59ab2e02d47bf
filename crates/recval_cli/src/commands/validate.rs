use anyhow::{Context, Result, bail};
use recval_core::{RecordValidator, SchemaNode, ValidationContext, user_schema};
use recval_parser::parse_file;
use recval_validator::ValidationEngine;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::output::{self, OutputFormat, RecordResult};

pub fn execute(
    records_path: &str,
    schema_path: Option<&str>,
    strict: bool,
    format: OutputFormat,
) -> Result<()> {
    info!("Validating records: {}", records_path);
    info!("Strict mode: {}", strict);

    let schema = load_schema(schema_path)?;
    let content = std::fs::read_to_string(records_path)
        .with_context(|| format!("Failed to read records file: {}", records_path))?;
    let records = parse_records(&content)
        .with_context(|| format!("Failed to parse records file: {}", records_path))?;

    if format == OutputFormat::Text {
        output::print_info(&format!(
            "Schema loaded: {} ({} fields), {} record(s) to validate",
            schema.name,
            schema.fields.len(),
            records.len()
        ));
    }

    let context = ValidationContext::new().with_strict(strict);
    let results = validate_batch(&schema, &records, context);

    output::print_batch_report(&results, format)?;

    if results.iter().any(|r| !r.outcome.is_valid()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads a schema file, or the built-in User schema when no path is given.
pub fn load_schema(path: Option<&str>) -> Result<SchemaNode> {
    match path {
        Some(path) => parse_file(Path::new(path))
            .with_context(|| format!("Failed to parse schema file: {}", path)),
        None => user_schema().context("Built-in User schema is invalid"),
    }
}

/// Accepts a JSON array of records or a single record.
pub fn parse_records(content: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        other => bail!("Expected a JSON object or array, found {}", other),
    }
}

/// Validates each record independently, numbering them from 1.
pub fn validate_batch(
    schema: &SchemaNode,
    records: &[Value],
    context: ValidationContext,
) -> Vec<RecordResult> {
    let engine = ValidationEngine::with_context(context);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| RecordResult {
            index: i + 1,
            label: record
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            outcome: engine.validate_record(schema, record),
        })
        .collect()
}
