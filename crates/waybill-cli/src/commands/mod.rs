//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod parse;

use std::path::Path;

use waybill_core::ParserConfig;

/// Load the configuration named on the command line, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ParserConfig> {
    let config = match config_path {
        Some(path) => ParserConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e))?,
        None => ParserConfig::default(),
    };
    Ok(config)
}
