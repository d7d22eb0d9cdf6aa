//! Logging configuration using the tracing ecosystem.
//!
//! This module configures structured logging with:
//! - File-based output (to avoid TUI corruption)
//! - Daily log rotation
//! - Environment-based log level configuration
//! - An optional `telemetry` target for error reporting

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::config::Settings;

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "souq_admin=info,warn";

/// Target used for error reports.
pub const TELEMETRY_TARGET: &str = "telemetry";

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Daily rotating file appender in the user's local data directory
/// - Log level configuration via `RUST_LOG` environment variable
/// - Structured output with file/line numbers and thread IDs
///
/// # Log Directory
///
/// Logs are stored in the platform-specific local data directory:
/// - Linux: `~/.local/share/souq-admin/logs/`
/// - macOS: `~/Library/Application Support/souq-admin/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\souq-admin\logs\`
///
/// # Log Levels
///
/// Configure via `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Verbose output for debugging
/// - `RUST_LOG=souq_admin=debug` - Debug only for the dashboard
/// - `RUST_LOG=souq_admin::cache=trace` - Cache hits and coalesced fetches
///
/// # Errors
///
/// Returns an error if:
/// - The log directory cannot be determined or created
/// - The tracing subscriber cannot be set
pub fn init() -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "souq-admin.log");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Souq admin starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

/// Get the log directory path.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("souq-admin").join("logs"))
}

/// Get the path where logs are stored.
///
/// This is useful for displaying to users where they can find log files.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("Souq admin shutting down");
}

/// Error reporting switch.
///
/// When enabled, errors shown to the user are also logged under the
/// [`TELEMETRY_TARGET`] target together with the DSN and environment, so a
/// collector can forward them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Telemetry {
    dsn: Option<String>,
    environment: String,
}

impl Telemetry {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            dsn: settings
                .telemetry_enabled()
                .then(|| settings.sentry_dsn.clone())
                .flatten(),
            environment: settings.environment.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dsn.is_some()
    }

    /// Report an error. Returns whether anything was emitted.
    pub fn capture(&self, source: &str, message: &str) -> bool {
        match &self.dsn {
            Some(dsn) => {
                tracing::error!(
                    target: TELEMETRY_TARGET,
                    dsn = %dsn,
                    environment = %self.environment,
                    source,
                    message,
                    "Captured error"
                );
                true
            }
            None => false,
        }
    }
}
