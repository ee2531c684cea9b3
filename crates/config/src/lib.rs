//! Configuration loading, validation, and management for Chatweave.
//!
//! Loads configuration from a TOML file with environment variable
//! overrides. Validates all settings before the pipeline is constructed.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for chatweave_core::Error {
    fn from(err: ConfigError) -> Self {
        chatweave_core::Error::Config {
            message: err.to_string(),
        }
    }
}

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User preference: whether queries may trigger web retrieval.
    #[serde(default = "default_true")]
    pub allow_web_access: bool,

    /// Web retrieval settings
    #[serde(default)]
    pub web: WebConfig,

    /// Generation sampling settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allow_web_access: true,
            web: WebConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Settings for the web-retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Search engine results-page endpoint (query appended as `?q=`).
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,

    /// Known-reachable host used for the connectivity probe.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Per-page fetch timeout.
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for fetching the search-results page itself.
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,

    /// Hard character cap applied to every fetched page.
    #[serde(default = "default_page_char_cap")]
    pub page_char_cap: usize,

    /// User-agent for page fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// User-agent for the search-results request (browser-like; some
    /// engines reject obvious bots with a 403).
    #[serde(default = "default_search_user_agent")]
    pub search_user_agent: String,
}

fn default_search_endpoint() -> String {
    "https://duckduckgo.com/html/".into()
}
fn default_probe_url() -> String {
    "https://www.google.com".into()
}
fn default_page_timeout() -> u64 {
    10
}
fn default_search_timeout() -> u64 {
    15
}
fn default_page_char_cap() -> usize {
    3000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; Chatweave/0.1)".into()
}
fn default_search_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".into()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            probe_url: default_probe_url(),
            page_timeout_secs: default_page_timeout(),
            search_timeout_secs: default_search_timeout(),
            page_char_cap: default_page_char_cap(),
            user_agent: default_user_agent(),
            search_user_agent: default_search_user_agent(),
        }
    }
}

/// Sampling temperatures for the two generator call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature for conversational replies.
    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,

    /// Temperature for thread-title synthesis (low: want short and literal).
    #[serde(default = "default_title_temperature")]
    pub title_temperature: f32,
}

fn default_reply_temperature() -> f32 {
    0.7
}
fn default_title_temperature() -> f32 {
    0.3
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            reply_temperature: default_reply_temperature(),
            title_temperature: default_title_temperature(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply env overrides and
    /// validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from a file if it exists, otherwise fall back to defaults.
    /// Env overrides and validation apply either way.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Environment variables take precedence over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CHATWEAVE_ALLOW_WEB_ACCESS") {
            self.allow_web_access = matches!(v.as_str(), "1" | "true" | "yes");
        }
        if let Ok(v) = std::env::var("CHATWEAVE_SEARCH_ENDPOINT") {
            self.web.search_endpoint = v;
        }
        if let Ok(v) = std::env::var("CHATWEAVE_PROBE_URL") {
            self.web.probe_url = v;
        }
    }

    /// Reject settings the pipeline cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.web.page_timeout_secs == 0 || self.web.search_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be non-zero".into()));
        }
        if self.web.page_char_cap == 0 {
            return Err(ConfigError::Invalid("page_char_cap must be non-zero".into()));
        }
        if !self.web.search_endpoint.starts_with("http") {
            return Err(ConfigError::Invalid(format!(
                "search_endpoint must be an http(s) URL, got '{}'",
                self.web.search_endpoint
            )));
        }
        for (name, t) in [
            ("reply_temperature", self.generation.reply_temperature),
            ("title_temperature", self.generation.title_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0.0, 2.0], got {t}"
                )));
            }
        }
        Ok(())
    }
}
