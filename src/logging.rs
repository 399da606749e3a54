//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily rotated file so the terminal UI is never written over.
//! The filter comes from `RUST_LOG` when set, otherwise from [`LogLevel`].

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// File name prefix of the rotated log files.
const LOG_FILE_PREFIX: &str = "resumedeck.log";

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Normal,
    Verbose,
}

impl LogLevel {
    pub fn from_verbose_flag(verbose: bool) -> Self {
        if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    fn default_filter(self) -> &'static str {
        match self {
            LogLevel::Normal => "resumedeck=info,warn",
            LogLevel::Verbose => "resumedeck=debug,reqwest=debug,info",
        }
    }
}

/// Initialize the logging system.
///
/// # Log Directory
///
/// Logs are stored in the platform-specific local data directory:
/// - Linux: `~/.local/share/resumedeck/logs/`
/// - macOS: `~/Library/Application Support/resumedeck/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\resumedeck\logs\`
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init(level: LogLevel) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.default_filter()));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), ?level, "resumedeck starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("resumedeck").join("logs"))
}

/// Get the path where logs are stored, for error hints.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

pub fn shutdown() {
    tracing::info!("resumedeck shutting down");
}
