//! Config command - manage the parser configuration file.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use waybill_core::ParserConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write the default configuration to a file
    Init {
        /// Output path (defaults to the user config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, e.g. "extraction.context_window"
    Get { key: String },

    /// Change one value; JSON literals are parsed, anything else is a string
    Set { key: String, value: String },

    /// Show the configuration file path
    Path,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let file = ConfigFile::user();

    match args.command {
        ConfigCommand::Show => {
            if !file.exists() {
                println!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&file.load()?)?);
        }
        ConfigCommand::Init { output, force } => {
            let target = output.map(ConfigFile::at).unwrap_or(file);
            if target.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    target.path.display()
                );
            }
            target.store(&ParserConfig::default())?;
            println!(
                "{} Created configuration file at {}",
                style("✓").green(),
                target.path.display()
            );
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(file.load()?)?;
            println!("{}", serde_json::to_string_pretty(value_at(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let value = parse_value(&value);
            let config = with_value(&file.load()?, &key, value.clone())?;
            file.store(&config)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", file.path.display());
            if file.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'waybill config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

/// A configuration file on disk; a missing file reads as the defaults.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config dir>/waybill/config.json`.
    fn user() -> Self {
        Self::at(
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("waybill")
                .join("config.json"),
        )
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> anyhow::Result<ParserConfig> {
        if self.exists() {
            Ok(ParserConfig::from_file(&self.path)?)
        } else {
            Ok(ParserConfig::default())
        }
    }

    fn store(&self, config: &ParserConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        Ok(())
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// The value under a dotted key.
fn value_at<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |node, part| {
        node.get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// A copy of `config` with one existing key replaced, checked by `validate`.
fn with_value(config: &ParserConfig, key: &str, value: Value) -> anyhow::Result<ParserConfig> {
    let mut json = serde_json::to_value(config)?;

    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };
    let mut node = &mut json;
    for part in parent.into_iter().flat_map(|p| p.split('.')) {
        node = node
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }
    match node.as_object_mut() {
        Some(section) if section.contains_key(leaf) => {
            section.insert(leaf.to_string(), value);
        }
        Some(_) => anyhow::bail!("Configuration key not found: {}", key),
        None => anyhow::bail!("{} is not a configuration section", parent.unwrap_or(key)),
    }

    let updated: ParserConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    updated
        .validate()
        .map_err(|reason| anyhow::anyhow!("Invalid value for {}: {}", key, reason))?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_at_nested_key() {
        let json = serde_json::to_value(ParserConfig::default()).unwrap();
        assert_eq!(value_at(&json, "extraction.context_window").unwrap(), &Value::from(50));
        assert!(value_at(&json, "extraction.missing").is_err());
    }

    #[test]
    fn test_with_value_replaces_existing_key() {
        let config = with_value(
            &ParserConfig::default(),
            "extraction.include_carrier",
            parse_value("true"),
        )
        .unwrap();
        assert!(config.extraction.include_carrier);

        let config = with_value(
            &ParserConfig::default(),
            "normalization.reference_data",
            parse_value("/tmp/tables.json"),
        )
        .unwrap();
        assert_eq!(
            config.normalization.reference_data,
            Some(PathBuf::from("/tmp/tables.json"))
        );
    }

    #[test]
    fn test_with_value_rejects_bad_input() {
        let config = ParserConfig::default();
        assert!(with_value(&config, "extraction.no_such_key", Value::from(1)).is_err());
        assert!(with_value(&config, "extraction.context_window", Value::from(0)).is_err());
        assert!(with_value(&config, "extraction.context_window", parse_value("wide")).is_err());
        assert!(with_value(&config, "extraction.context_window.deep", Value::from(1)).is_err());
    }
}
