//! Plangen configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::CarryoverPolicy;

/// Main plangen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Generation pipeline tuning
    pub generation: GenerationConfig,

    /// Storage configuration
    pub storage: StorageConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables are set. Call this early
    /// in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .plangen.yml
        let local_config = PathBuf::from(".plangen.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/plangen/plangen.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("plangen").join("plangen.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> std::result::Result<String, String> {
        std::env::var(&self.api_key_env).map_err(|_| format!("environment variable {} is not set", self.api_key_env))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

/// Generation pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Minimum tag-overlap score a candidate needs to survive pruning
    #[serde(rename = "min-score")]
    pub min_score: usize,

    /// Maximum candidates per phase handed to a selector call
    #[serde(rename = "max-candidates")]
    pub max_candidates: usize,

    /// Which half of each phase's chosen ids carries into the exclusion set
    pub carryover: CarryoverPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_score: 1,
            max_candidates: 12,
            carryover: CarryoverPolicy::FirstHalf,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store directory; defaults to `<data_local_dir>/plangen/store`
    #[serde(rename = "data-dir")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store directory
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("plangen")
                .join("store")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.generation.min_score, 1);
        assert_eq!(config.generation.max_candidates, 12);
        assert_eq!(config.generation.carryover, CarryoverPolicy::FirstHalf);
    }

    #[test]
    fn test_parse_yaml_with_kebab_keys() {
        let yaml = r#"
llm:
  provider: openai
  model: gpt-4o
  api-key-env: OPENAI_API_KEY
  max-tokens: 4096
generation:
  min-score: 2
  max-candidates: 8
  carryover: alternating
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.generation.min_score, 2);
        assert_eq!(config.generation.carryover, CarryoverPolicy::Alternating);
        // Unset sections fall back to defaults
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_resolve_data_dir_explicit() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/pg-store")),
        };
        assert_eq!(storage.resolve_data_dir(), PathBuf::from("/tmp/pg-store"));
    }
}
