//! Configuration structures for the parsing pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the waybill parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Normalization configuration.
    pub normalization: NormalizationConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters of context inspected on each side of a match for keywords.
    pub context_window: usize,

    /// Earliest accepted year of birth.
    pub min_birth_year: i32,

    /// Latest accepted year of birth.
    pub max_birth_year: i32,

    /// Also extract the carrier company and its short name.
    pub include_carrier: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_window: 50,
            min_birth_year: 1900,
            max_birth_year: 2007,
            include_carrier: false,
        }
    }
}

/// Normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Run the normalization pass after extraction.
    pub enabled: bool,

    /// JSON file with reference tables; the embedded tables are used when unset.
    pub reference_data: Option<PathBuf>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reference_data: None,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction.min_birth_year > self.extraction.max_birth_year {
            return Err(format!(
                "min_birth_year {} is after max_birth_year {}",
                self.extraction.min_birth_year, self.extraction.max_birth_year
            ));
        }
        if self.extraction.context_window == 0 {
            return Err("context_window must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"extraction": {"include_carrier": true}}"#).unwrap();
        assert!(config.extraction.include_carrier);
        assert_eq!(config.extraction.context_window, 50);
        assert_eq!(config.extraction.max_birth_year, 2007);
        assert!(config.normalization.enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ParserConfig::default();
        config.extraction.context_window = 80;
        config.save(&path).unwrap();

        let loaded = ParserConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.context_window, 80);
    }

    #[test]
    fn test_validate_rejects_inverted_year_range() {
        let mut config = ParserConfig::default();
        config.extraction.min_birth_year = 2010;
        assert!(config.validate().is_err());
        assert!(ParserConfig::default().validate().is_ok());
    }
}
