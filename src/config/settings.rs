//! Application settings configuration.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};
use crate::i18n::Language;
use crate::table::PAGE_SIZES;

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where real API requests would go.
    pub api_base_url: String,
    /// Requests slower than this are abandoned.
    pub api_timeout_ms: u64,
    /// Deployment environment name ("development", "staging", "production").
    pub environment: String,
    /// Whether errors are reported to the error tracker.
    pub enable_sentry: bool,
    /// Error tracker DSN. Required when `enable_sentry` is set.
    pub sentry_dsn: Option<String>,
    /// Display language at startup.
    pub language: Language,
    /// Records requested per server page.
    pub page_limit: u32,
    /// Initial rows per table page.
    pub default_page_size: usize,
    /// How long fetched pages stay fresh, in seconds.
    pub cache_ttl_seconds: u64,
    /// Simulated network latency bounds.
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Whether to use vim-style keybindings.
    pub vim_mode: bool,
    /// Credentials accepted at the login screen.
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            api_timeout_ms: 10_000,
            environment: "development".to_string(),
            enable_sentry: false,
            sentry_dsn: None,
            language: Language::English,
            page_limit: 50,
            default_page_size: 10,
            cache_ttl_seconds: 60,
            min_latency_ms: 300,
            max_latency_ms: 800,
            vim_mode: true,
            admin_email: "admin@souq.example".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::ValidationError(format!("{} has an invalid value '{}'", name, value))
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::ValidationError(format!(
            "{} must be true or false, got '{}'",
            name, value
        ))),
    }
}

impl Settings {
    /// Apply `SOUQ_*` environment variables on top of the file values.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("SOUQ_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("SOUQ_API_TIMEOUT_MS") {
            self.api_timeout_ms = parse_env("SOUQ_API_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("SOUQ_ENVIRONMENT") {
            self.environment = v;
        }
        if let Some(v) = lookup("SOUQ_ENABLE_SENTRY") {
            self.enable_sentry = parse_bool("SOUQ_ENABLE_SENTRY", &v)?;
        }
        if let Some(v) = lookup("SOUQ_SENTRY_DSN") {
            self.sentry_dsn = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("SOUQ_LANGUAGE") {
            self.language = v.parse().map_err(ConfigError::ValidationError)?;
        }
        debug!(environment = %self.environment, "Applied environment overrides");
        Ok(())
    }

    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "api_base_url '{}' must start with http:// or https://",
                self.api_base_url
            )));
        }

        if self.api_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "api_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.enable_sentry && self.sentry_dsn.is_none() {
            return Err(ConfigError::ValidationError(
                "enable_sentry is set but sentry_dsn is missing".to_string(),
            ));
        }

        if !PAGE_SIZES.contains(&self.default_page_size) {
            return Err(ConfigError::ValidationError(format!(
                "default_page_size {} must be one of {:?}",
                self.default_page_size, PAGE_SIZES
            )));
        }

        if self.page_limit == 0 {
            return Err(ConfigError::ValidationError(
                "page_limit must be greater than zero".to_string(),
            ));
        }

        if self.min_latency_ms > self.max_latency_ms {
            return Err(ConfigError::ValidationError(format!(
                "min_latency_ms ({}) cannot exceed max_latency_ms ({})",
                self.min_latency_ms, self.max_latency_ms
            )));
        }

        Ok(())
    }

    /// Whether error telemetry should be emitted.
    pub fn telemetry_enabled(&self) -> bool {
        self.enable_sentry && self.sentry_dsn.is_some()
    }
}
