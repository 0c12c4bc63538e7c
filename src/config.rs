//! Configuration management for Scholar
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::chat_mode::ChatMode;
use crate::error::{Result, ScholarError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Scholar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Assistant service connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Assistant service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base address that `/history`, `/ask` and `/upload` are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_user_agent() -> String {
    format!("scholar/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Interactive chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Mode selected when a chat starts
    #[serde(default = "default_chat_mode")]
    pub default_mode: String,

    /// Print the session sidebar when the interactive chat opens
    #[serde(default = "default_show_sidebar")]
    pub show_sidebar_on_start: bool,
}

fn default_chat_mode() -> String {
    ChatMode::default().as_str().to_string()
}

fn default_show_sidebar() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_mode: default_chat_mode(),
            show_sidebar_on_start: default_show_sidebar(),
        }
    }
}

impl ChatConfig {
    /// The configured default mode, falling back to `exam` if it does not parse
    pub fn mode(&self) -> ChatMode {
        ChatMode::parse_str(&self.default_mode).unwrap_or_default()
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScholarError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ScholarError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("SCHOLAR_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: SCHOLAR_BASE_URL");
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("SCHOLAR_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.server.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid SCHOLAR_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(mode) = std::env::var("SCHOLAR_DEFAULT_MODE") {
            match ChatMode::parse_str(&mode) {
                Ok(parsed) => self.chat.default_mode = parsed.as_str().to_string(),
                Err(_) => tracing::warn!("Invalid SCHOLAR_DEFAULT_MODE: {}, ignoring", mode),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            tracing::debug!(base_url = %base_url, "CLI override: --base-url");
            self.server.base_url = base_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an http(s) URL, the timeout is
    /// zero, or the default mode is unknown
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server.base_url).map_err(|e| {
            ScholarError::Config(format!(
                "Invalid server.base_url {}: {}",
                self.server.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScholarError::Config(format!(
                "server.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.server.timeout_seconds == 0 {
            return Err(ScholarError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if let Err(e) = ChatMode::parse_str(&self.chat.default_mode) {
            return Err(ScholarError::Config(format!("chat.default_mode: {}", e)).into());
        }

        Ok(())
    }
}
