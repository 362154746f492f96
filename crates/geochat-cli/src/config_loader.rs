//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use geochat_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::PathBuf;

use crate::cli::ConfigArgs;

const DEFAULT_CONFIG_FILE: &str = "geochat.toml";

/// Layer defaults, the config file, the environment and CLI flags
pub fn load_config(args: &ConfigArgs) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(args) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        llm: args.llm.clone(),
        llm_base_url: args.llm_base_url.clone(),
        data_dir: args.data_dir.clone(),
        mapping_file: args.mapping_file.clone(),
    });

    Ok(config)
}

/// Explicit `--config`, else `./geochat.toml` if it exists
fn config_file(args: &ConfigArgs) -> Option<PathBuf> {
    args.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    })
}
