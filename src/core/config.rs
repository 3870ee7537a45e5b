//! Configuration management for the kensaku engine.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Configuration is loaded once at startup and treated as immutable
//! for the process lifetime; the analysis chains are constructed from
//! it and never reconfigured afterwards.

use crate::core::error::{KensakuError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Text analysis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Literal substitutions applied to raw text before tokenization,
    /// e.g. `":)" = "happy"`. Applied in key order for determinism.
    #[serde(default)]
    pub char_mappings: BTreeMap<String, String>,

    /// Fold tokens to lowercase
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    /// Stop words removed after tokenization
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Apply Snowball stemming to tokens
    #[serde(default = "default_stemming")]
    pub stemming: bool,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum results per query (requested counts are clamped)
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Maximum query string length in bytes
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

// Default value functions
fn default_lowercase() -> bool {
    true
}

fn default_stemming() -> bool {
    true
}

fn default_max_count() -> usize {
    100
}

fn default_max_query_length() -> usize {
    500
}

/// English function words excluded from the index by default. Content
/// words users would search for are deliberately absent.
static DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            char_mappings: BTreeMap::new(),
            lowercase: default_lowercase(),
            stop_words: default_stop_words(),
            stemming: default_stemming(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| KensakuError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with priority: KENSAKU_CONFIG file > ./kensaku.toml > defaults
    pub fn load() -> Result<Self> {
        let config = if let Ok(config_path) = env::var("KENSAKU_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("kensaku.toml").exists() {
            Self::from_file("kensaku.toml")?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.max_count == 0 {
            return Err(KensakuError::ConfigError(
                "Max result count must be non-zero".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(KensakuError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        for (from, _) in &self.analysis.char_mappings {
            if from.is_empty() {
                return Err(KensakuError::ConfigError(
                    "Character mapping key must be non-empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Log configuration details at startup
    pub fn log_config(&self) {
        tracing::info!(
            "Analysis config: {} char mapping(s), lowercase={}, {} stop word(s), stemming={}",
            self.analysis.char_mappings.len(),
            self.analysis.lowercase,
            self.analysis.stop_words.len(),
            self.analysis.stemming
        );
        tracing::info!(
            "Search config: max_count={}, max_query_length={}",
            self.search.max_count,
            self.search.max_query_length
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.analysis.char_mappings.is_empty());
        assert!(config.analysis.lowercase);
        assert!(config.analysis.stemming);
        assert!(config.analysis.stop_words.contains(&"the".to_string()));
        assert_eq!(config.search.max_count, 100);
        assert_eq!(config.search.max_query_length, 500);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[analysis]
lowercase = true
stemming = false
stop_words = ["the", "a"]

[analysis.char_mappings]
":)" = "happy"

[search]
max_count = 50
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(
            config.analysis.char_mappings.get(":)"),
            Some(&"happy".to_string())
        );
        assert!(!config.analysis.stemming);
        assert_eq!(config.analysis.stop_words.len(), 2);
        assert_eq!(config.search.max_count, 50);
        // Unspecified values fall back to defaults
        assert_eq!(config.search.max_query_length, 500);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nmax_count = 10").unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.search.max_count, 10);
        assert!(config.analysis.lowercase);
        assert!(!config.analysis.stop_words.is_empty());
    }

    #[test]
    fn test_validate_rejects_zero_max_count() {
        let mut config = Config::default();
        config.search.max_count = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().is_bad_request());
    }

    #[test]
    fn test_validate_rejects_empty_mapping_key() {
        let mut config = Config::default();
        config
            .analysis
            .char_mappings
            .insert(String::new(), "x".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = Config::from_file("/nonexistent/kensaku.toml");
        assert!(matches!(result, Err(KensakuError::ConfigError(_))));
    }
}
