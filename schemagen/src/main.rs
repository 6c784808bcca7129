//! CLI entry point for schemagen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use schemagen::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate entity, mapper, service and controller sources from a live database schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML, TOML or JSON); defaults to ./schemagen.*
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides output.base_output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace files that already exist
    #[arg(long)]
    overwrite: bool,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all configured artifacts
    Generate,
    /// Inspect schema (show scanned tables for debugging)
    Inspect,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(output) = cli.output {
        config.output.base_output_dir = output;
    }
    if cli.overwrite {
        config.output.overwrite_enable = true;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    if let Some(Commands::Inspect) = &cli.command {
        return inspect_schema(&config).await;
    }

    info!("Generating code for {} tables", config.tables.len());
    let report = schemagen::generate(&config).await?;

    if config.dry_run {
        info!("Dry run complete, nothing written");
    } else {
        info!(
            "Code generation completed successfully: {} written, {} skipped",
            report.written(),
            report.skipped()
        );
    }
    Ok(())
}

async fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let tables = schemagen::inspect(config).await?;

    println!("Scanned {} tables:\n", tables.len());
    for table in tables.values() {
        println!("Table: {} -> {}", table.table_name, table.entity_name);
        if !table.table_comment.is_empty() {
            println!("  Comment: {}", table.table_comment);
        }
        println!("  Columns:");
        for col in &table.columns {
            let comment = if col.comment.is_empty() {
                String::new()
            } else {
                format!("  -- {}", col.comment)
            };
            println!(
                "    - {} {} -> {} {}{}",
                col.column_name, col.column_type, col.field_type, col.field_name, comment
            );
        }
        if !table.import_packages.is_empty() {
            println!("  Imports:");
            for import in &table.import_packages {
                println!("    - {}", import);
            }
        }
        println!();
    }

    Ok(())
}
