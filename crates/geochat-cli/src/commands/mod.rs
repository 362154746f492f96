//! Command implementations

mod ask;
mod config;
mod fields;
mod filter;
mod scan;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use geochat_core::config::LayeredConfig;
use geochat_core::models::TypeMapping;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let layered = load_config(&cli.config)?;

    match cli.command {
        Commands::Scan(args) => scan::execute(args, &layered, &output),
        Commands::Fields(args) => fields::execute(args, &layered, &output).await,
        Commands::Filter(args) => filter::execute(args, &layered, &output).await,
        Commands::Ask(args) => ask::execute(args, &layered, &output).await,
        Commands::Config => config::execute(&layered, &output),
    }
}

/// Type mapping from the configured file, else the built-in table
fn load_mapping(config: &LayeredConfig) -> Result<TypeMapping> {
    match &config.mapping_file.value {
        Some(path) => TypeMapping::load_from_file(path)
            .with_context(|| format!("Failed to load type mapping {}", path.display())),
        None => Ok(TypeMapping::default()),
    }
}
