//! Configuration loading and validation for GreenMow.
//!
//! Loads configuration from a TOML file with environment variable overrides
//! for secrets. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `greenmow.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the hosted model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model / deployment name
    #[serde(default = "default_model")]
    pub model: String,

    /// The assistant's self-identification name
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Knowledge base configuration
    #[serde(default)]
    pub kb: KbConfig,

    /// Fleet store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session store configuration
    #[serde(default)]
    pub sessions: SessionConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4.1-mini".into()
}
fn default_bot_name() -> String {
    "OB Bot".into()
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
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("bot_name", &self.bot_name)
            .field("kb", &self.kb)
            .field("store", &self.store)
            .field("gateway", &self.gateway)
            .field("sessions", &self.sessions)
            .finish()
    }
}

/// Knowledge base corpus and chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbConfig {
    /// Directory scanned for .txt/.md/.pdf corpus files
    #[serde(default = "default_kb_dir")]
    pub dir: PathBuf,

    /// Chunk window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_kb_dir() -> PathBuf {
    PathBuf::from("kb")
}
fn default_chunk_size() -> usize {
    800
}
fn default_overlap() -> usize {
    120
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            dir: default_kb_dir(),
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

/// Fleet store (SQLite) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("greenmow.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of concurrently tracked sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (`greenmow.toml` in the
    /// working directory).
    ///
    /// Also checks environment variables for overrides:
    /// - `GREENMOW_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `GREENMOW_API_URL`
    /// - `GREENMOW_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(Path::new("greenmow.toml"))?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("GREENMOW_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(url) = std::env::var("GREENMOW_API_URL") {
            config.api_url = url;
        }

        if let Ok(model) = std::env::var("GREENMOW_MODEL") {
            config.model = model;
        }

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

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.kb.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "kb.chunk_size must be greater than 0".into(),
            ));
        }

        if self.kb.overlap >= self.kb.chunk_size {
            return Err(ConfigError::ValidationError(
                "kb.overlap must be smaller than kb.chunk_size".into(),
            ));
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "sessions.max_sessions must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `init` output).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            bot_name: default_bot_name(),
            kb: KbConfig::default(),
            store: StoreConfig::default(),
            gateway: GatewayConfig::default(),
            sessions: SessionConfig::default(),
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.kb.chunk_size, 800);
        assert_eq!(config.kb.overlap, 120);
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.sessions.max_sessions, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.kb.chunk_size, config.kb.chunk_size);
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let config = AppConfig {
            kb: KbConfig {
                chunk_size: 100,
                overlap: 100,
                ..KbConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let config = AppConfig {
            kb: KbConfig {
                chunk_size: 0,
                overlap: 0,
                ..KbConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/greenmow.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().bot_name, "OB Bot");
    }

    #[test]
    fn load_from_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greenmow.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
model = "gpt-4o"
bot_name = "FleetBot"

[kb]
dir = "docs"
chunk_size = 400
overlap = 50

[gateway]
port = 9001
"#
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.bot_name, "FleetBot");
        assert_eq!(config.kb.dir, PathBuf::from("docs"));
        assert_eq!(config.kb.chunk_size, 400);
        assert_eq!(config.gateway.port, 9001);
        // untouched sections keep defaults
        assert_eq!(config.sessions.max_sessions, 1000);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
