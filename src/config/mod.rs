//! Configuration management for the Souq admin dashboard.
//!
//! This module handles loading and saving the user's configuration file and
//! layering environment overrides on top of it.

mod settings;

pub use settings::Settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error("failed to create configuration directory: {0}")]
    CreateDirError(std::io::Error),

    #[error("failed to read configuration file: {0}")]
    ReadError(std::io::Error),

    #[error("failed to write configuration file: {0}")]
    WriteError(std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Default location of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("souq-admin").join("config.toml"))
    }

    /// Load the configuration from the default location.
    ///
    /// A missing file yields the default configuration. Environment
    /// overrides are applied and the result is validated.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load the configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
            let config: Config = toml::from_str(&contents)?;
            info!(path = %path.display(), "Loaded configuration");
            config
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Config::default()
        };
        config.settings.apply_env()?;
        config.settings.validate()?;
        Ok(config)
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.settings.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}
