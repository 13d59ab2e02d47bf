use anyhow::{Context, Result};
use recval_core::{SAMPLE_USERS_JSON, ValidationContext, user_schema};
use tracing::info;

use super::validate::{parse_records, validate_batch};
use crate::output::{self, OutputFormat};

pub fn execute(format: OutputFormat) -> Result<()> {
    info!("Running demo with bundled sample users");

    let schema = user_schema().context("Built-in User schema is invalid")?;
    let records =
        parse_records(SAMPLE_USERS_JSON).context("Bundled sample users are malformed")?;

    if format == OutputFormat::Text {
        output::print_info(&format!(
            "Validating {} sample user(s) against the built-in '{}' schema",
            records.len(),
            schema.name
        ));
    }

    let results = validate_batch(&schema, &records, ValidationContext::new());
    output::print_batch_report(&results, format)
}
