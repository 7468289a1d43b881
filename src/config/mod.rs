//! Externalized configuration for the two backend services.
//!
//! Keys and endpoints are never compiled in: they come from an optional TOML
//! file (`~/.cass/config.toml` by default) overridden by environment
//! variables. Routing keywords, prompts and sanitizer phrase lists are
//! behavior, not deployment configuration, and stay in their owning modules.

use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_COMPLETION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.tavily.com/search";

/// Completion replies are kept terse to honor the two-sentence policy.
pub const COMPLETION_MAX_OUTPUT_TOKENS: u32 = 80;
pub const COMPLETION_TEMPERATURE: f64 = 0.6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub completion: CompletionConfig,
    pub search: SearchConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first (3 attempts total).
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            search: SearchConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff_ms: 50,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from the given path, or from `~/.cass/config.toml` when present,
    /// falling back to defaults. Environment overrides always apply last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Load(e.to_string()))
    }

    fn default_path() -> Option<std::path::PathBuf> {
        UserDirs::new().map(|u| u.home_dir().join(".cass").join("config.toml"))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("CASS_GEMINI_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
            && !key.is_empty()
        {
            self.completion.api_key = key;
        }

        if let Ok(key) =
            std::env::var("CASS_TAVILY_API_KEY").or_else(|_| std::env::var("TAVILY_API_KEY"))
            && !key.is_empty()
        {
            self.search.api_key = key;
        }

        if let Ok(endpoint) = std::env::var("CASS_COMPLETION_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.completion.endpoint = endpoint;
        }

        if let Ok(endpoint) = std::env::var("CASS_SEARCH_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.search.endpoint = endpoint;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.completion.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "completion api_key is empty (set GEMINI_API_KEY)".into(),
            ));
        }
        if self.search.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "search api_key is empty (set TAVILY_API_KEY)".into(),
            ));
        }
        Ok(())
    }
}
