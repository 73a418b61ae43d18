//! Configuration loading, validation, and management for carewise.
//!
//! Loads configuration from `~/.carewise/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Only the binary reads configuration. Library components receive the
//! values they need (credential, window size, model parameters) explicitly.

use carewise_core::conversation::DEFAULT_HISTORY_WINDOW;
use carewise_core::gateway::{Credential, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The system instruction sent with every gateway request unless overridden.
pub const DEFAULT_SYSTEM_PROMPT: &str = concat!(
    "You are a supportive assistant for family caregivers of people living with ",
    "dementia and other cognitive conditions. Answer with practical, compassionate, ",
    "plain-language guidance. You are not a clinician: never diagnose, never ",
    "prescribe, and recommend contacting the care team for medical decisions."
);

/// The root configuration structure.
///
/// Maps directly to `~/.carewise/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Well-known provider name used to pick a base URL
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Explicit base URL (overrides the provider's default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Gateway call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many recent turns are replayed into each prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// System instruction for the model
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("history_window", &self.history_window)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.carewise/config.toml).
    ///
    /// Also checks environment variables:
    /// - `CAREWISE_API_KEY` (highest priority), `OPENAI_API_KEY`, `OPENROUTER_API_KEY`
    /// - `CAREWISE_PROVIDER`, `CAREWISE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// A key present in the file wins over the environment; provider and
    /// model overrides always win.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("CAREWISE_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .or_else(|| lookup("OPENROUTER_API_KEY"))
                .filter(|k| !k.trim().is_empty());
        }

        if let Some(provider) = lookup("CAREWISE_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("CAREWISE_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".carewise")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be > 0".into(),
            ));
        }

        if self.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "history_window must be > 0".into(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The configured credential, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(Credential::new)
    }

    /// Whether a gateway call can be attempted at all.
    pub fn has_access(&self) -> bool {
        self.credential().is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            history_window: default_history_window(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
