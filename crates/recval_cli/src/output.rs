use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use recval_core::{Outcome, ValidationError};
use serde_json::json;

/// Report format for batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable report
    Text,
    /// Machine-readable JSON report
    Json,
}

/// Outcome of one record in a batch, with a display label.
pub struct RecordResult {
    pub index: usize,
    pub label: Option<String>,
    pub outcome: Outcome,
}

pub fn print_batch_report(results: &[RecordResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_report(results),
        OutputFormat::Text => print_text_report(results),
    }
}

fn print_text_report(results: &[RecordResult]) -> Result<()> {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    for result in results {
        let label = result
            .label
            .as_deref()
            .map(|l| format!(" ({})", l))
            .unwrap_or_default();

        match &result.outcome {
            Outcome::Valid(_) => {
                println!(
                    "\n{} Record {}{}: {}",
                    "✓".green().bold(),
                    result.index,
                    label,
                    "VALID".green().bold()
                );
                println!("{}", result.outcome.to_json_pretty()?);
            }
            Outcome::Invalid { errors } => {
                println!(
                    "\n{} Record {}{}: {}",
                    "✗".red().bold(),
                    result.index,
                    label,
                    "INVALID".red().bold()
                );
                for (i, error) in errors.iter().enumerate() {
                    println!("  {}. {}", i + 1, format_error(error).red());
                }
            }
        }
    }

    let valid = results.iter().filter(|r| r.outcome.is_valid()).count();
    println!("\n{}", "Summary:".bold());
    println!("  Total records:   {}", results.len());
    println!("  Valid records:   {}", valid);
    println!("  Invalid records: {}", results.len() - valid);
    println!("{}", "═".repeat(60));

    Ok(())
}

fn format_error(error: &ValidationError) -> String {
    let mut line = format!("[{}] {}: {}", error.kind, error.path, error.message);
    if let Some(constraint) = error.constraint {
        line.push_str(&format!(" ({})", constraint));
    }
    line
}

fn print_json_report(results: &[RecordResult]) -> Result<()> {
    let valid = results.iter().filter(|r| r.outcome.is_valid()).count();
    let output = json!({
        "records": results
            .iter()
            .map(|r| json!({
                "index": r.index,
                "valid": r.outcome.is_valid(),
                "result": r.outcome,
            }))
            .collect::<Vec<_>>(),
        "summary": {
            "total": results.len(),
            "valid": valid,
            "invalid": results.len() - valid,
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
