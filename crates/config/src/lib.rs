//! Configuration loading and validation for Pressroom.
//!
//! Loads configuration from `~/.pressroom/config.toml` with environment
//! variable overrides. A missing file means defaults.

use pressroom_core::TargetGroup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DB: &str = "PRESSROOM_DB";
pub const ENV_STORE: &str = "PRESSROOM_STORE";
pub const ENV_ORGANIZATION: &str = "PRESSROOM_ORGANIZATION";

const BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// The root configuration structure.
///
/// Maps directly to `~/.pressroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PressroomConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub organization: OrganizationConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "sqlite" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_backend() -> String {
    "sqlite".into()
}

fn default_db_path() -> String {
    PressroomConfig::config_dir()
        .join("pressroom.sqlite")
        .to_string_lossy()
        .into_owned()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Display name used in briefs and quote attributions
    #[serde(default)]
    pub name: String,

    /// Default industry tag for the rule layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Home location when the brand document names none
    #[serde(default = "default_fallback_location")]
    pub fallback_location: String,
}

fn default_fallback_location() -> String {
    "Deutschland".into()
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            industry: None,
            fallback_location: default_fallback_location(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target_group: Option<TargetGroup>,
}

impl PressroomConfig {
    /// Load configuration from the default path (~/.pressroom/config.toml),
    /// then apply environment overrides:
    /// - `PRESSROOM_DB`: SQLite path
    /// - `PRESSROOM_STORE`: backend name
    /// - `PRESSROOM_ORGANIZATION`: organization name
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

    /// Override fields from `lookup` (the process environment in `load`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB) {
            self.store.path = path;
        }
        if let Some(backend) = lookup(ENV_STORE) {
            self.store.backend = backend.trim().to_lowercase();
        }
        if let Some(name) = lookup(ENV_ORGANIZATION) {
            self.organization.name = name;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".pressroom")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !BACKENDS.contains(&self.store.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "store.backend must be one of {}, got '{}'",
                BACKENDS.join(", "),
                self.store.backend
            )));
        }

        if self.store.backend == "sqlite" && self.store.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "store.path must not be empty for the sqlite backend".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
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

impl From<ConfigError> for pressroom_core::Error {
    fn from(e: ConfigError) -> Self {
        pressroom_core::Error::Config { message: e.to_string() }
    }
}
