use anyhow::{Context, Result};
use recval_core::{RulePredicate, SchemaNode};
use recval_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(schema_path: &str) -> Result<()> {
    info!("Checking schema: {}", schema_path);

    let schema = parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    output::print_success("Schema is valid");

    println!("\nSchema Summary:");
    print_node(&schema, 1);

    Ok(())
}

fn print_node(node: &SchemaNode, depth: usize) {
    let indent = "  ".repeat(depth);

    println!("{}Name:        {}", indent, node.name);
    println!(
        "{}Description: {}",
        indent,
        node.description.as_deref().unwrap_or("N/A")
    );
    println!("{}Fields:      {}", indent, node.fields.len());

    for field in &node.fields {
        let constraints: Vec<&str> = field
            .constraints
            .iter()
            .map(|c| c.kind().as_str())
            .collect();
        let required = if field.required { "" } else { ", optional" };
        if constraints.is_empty() {
            println!(
                "{}  - {} ({}{})",
                indent, field.name, field.field_type, required
            );
        } else {
            println!(
                "{}  - {} ({}{}) [{}]",
                indent,
                field.name,
                field.field_type,
                required,
                constraints.join(", ")
            );
        }
    }

    if !node.rules.is_empty() {
        println!("{}Rules:", indent);
        for rule in &node.rules {
            let kind = match rule.predicate {
                RulePredicate::RangeWhen { .. } => "range_when",
                RulePredicate::Custom(_) => "custom",
            };
            println!("{}  - {} ({}) on {}", indent, rule.name, kind, rule.field);
        }
    }

    for (field, child) in node.nested() {
        println!("\n{}Nested '{}':", indent, field.name);
        print_node(child, depth + 1);
    }
}
