mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "recval")]
#[command(version, about = "Record validation engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON file holding one record or an array of records
    Validate {
        /// Path to the records file
        records: String,

        /// Schema definition file (YAML or TOML); defaults to the built-in User schema
        #[arg(short, long)]
        schema: Option<String>,

        /// Accept only exact JSON types (no string-to-number coercion)
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check a schema definition file without validating data
    Check {
        /// Path to the schema file (YAML or TOML)
        schema: String,
    },

    /// Validate the bundled sample users against the built-in User schema
    Demo {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG overrides --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Validate {
            records,
            schema,
            strict,
            format,
        } => commands::validate::execute(&records, schema.as_deref(), strict, format),

        Commands::Check { schema } => commands::check::execute(&schema),

        Commands::Demo { format } => commands::demo::execute(format),
    }
}
