//! Application configuration
//!
//! Data file locations and generation settings. Values come from an optional
//! `matchup.toml`; the LLM endpoint and credentials can be overridden from the
//! environment so secrets never need to live in the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{MatchupError, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "matchup.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Counter-relationship catalog (JSON object keyed by unit name)
    pub catalog_path: PathBuf,

    /// Combat stat table. When unset the built-in table is used.
    pub stats_path: Option<PathBuf>,

    /// Strategy corpus passed verbatim into prompts
    pub corpus_path: PathBuf,

    /// Text-generation service settings
    pub llm: LlmConfig,
}

/// Settings for the text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Endpoint URL. Anthropic URLs select the Anthropic wire format,
    /// anything else is treated as OpenAI-compatible.
    pub api_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Upper bound on generated tokens
    ///
    /// 2000 is enough for the three-section answer the prompt asks for.
    pub max_tokens: u32,

    /// API key. Never read from the file in practice; filled from `LLM_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/units.json"),
            stats_path: None,
            corpus_path: PathBuf::from("data/merged_strategies.txt"),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".into(),
            model: "claude-3-haiku-20240307".into(),
            max_tokens: 2000,
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MatchupError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from `path`, or defaults when the file does not exist.
    ///
    /// Environment overrides are applied and the result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                MatchupError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            tracing::debug!(path = %path.display(), "loaded config file");
            Self::from_toml_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        config.llm.apply_env(|key| std::env::var(key).ok());
        config.validate().map_err(MatchupError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err("catalog_path must not be empty".into());
        }
        self.llm.validate()
    }
}

impl LlmConfig {
    /// Apply `LLM_API_KEY`, `LLM_API_URL` and `LLM_MODEL` overrides
    ///
    /// The lookup is injected so tests do not depend on process state.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("LLM_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("LLM_API_URL").filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL").filter(|m| !m.is_empty()) {
            self.model = model;
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("llm.api_url must not be empty".into());
        }
        if self.model.trim().is_empty() {
            return Err("llm.model must not be empty".into());
        }
        if self.max_tokens == 0 {
            return Err("llm.max_tokens must be positive".into());
        }
        Ok(())
    }
}
