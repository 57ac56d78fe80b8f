//! Application configuration
//!
//! Provides TOML-based configuration with environment variable override
//! support. Priority: CLI args > Environment variables > Config file >
//! Defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the Keep-compatible note API
    #[serde(default = "default_api_url")]
    api_url: String,

    /// Bearer token for the note API
    #[serde(default)]
    api_token: Option<String>,

    /// Disable the sentinel-label restriction on mutating tools.
    ///
    /// Tracked as an Option so an explicit `false` from a higher-priority
    /// source (environment, CLI) can override a `true` from a lower one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unsafe_mode: Option<bool>,
}

fn default_api_url() -> String {
    "https://keep.googleapis.com/v1".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            unsafe_mode: None,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_url) = std::env::var("KEEP_MCP_API_URL") {
            config.api_url = api_url;
        }

        if let Ok(token) = std::env::var("KEEP_MCP_API_TOKEN") {
            config.api_token = Some(token);
        }

        config.unsafe_mode = env_flag("KEEP_MCP_UNSAFE_MODE").or_else(|| env_flag("UNSAFE_MODE"));

        config
    }

    /// Load the effective config: file (if present) overridden by environment
    pub fn load(config_path: &Path) -> Result<Self> {
        let file_config = if config_path.exists() {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };
        Ok(file_config.merge_with(&Self::from_env()))
    }

    /// Merge with another config (other takes priority for non-default values)
    pub fn merge_with(&self, other: &Self) -> Self {
        Self {
            api_url: if other.api_url != default_api_url() {
                other.api_url.clone()
            } else {
                self.api_url.clone()
            },
            api_token: other.api_token.clone().or_else(|| self.api_token.clone()),
            unsafe_mode: other.unsafe_mode.or(self.unsafe_mode),
        }
    }

    /// Override unsafe_mode (CLI flag)
    pub fn with_unsafe_mode(mut self, unsafe_mode: bool) -> Self {
        self.unsafe_mode = Some(unsafe_mode);
        self
    }

    /// Override api_url
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(anyhow!("api_url must not be empty"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow!("api_url must be an http(s) URL: {}", self.api_url));
        }
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    // Getters
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn unsafe_mode(&self) -> bool {
        self.unsafe_mode.unwrap_or(false)
    }
}
