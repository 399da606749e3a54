//! Centralized error types for resumedeck.
//!
//! This module aggregates the per-layer errors into one type with
//! user-facing messages. All error types use `thiserror`.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    ///
    /// Server failures carry the server's own text so that the user sees
    /// what the server reported.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ProfileNotFound(name) => format!("Profile '{}' not found.", name),
            },
            AppError::Api(e) => match e {
                ApiError::Unauthorized => {
                    "Not logged in. Check the profile's username and stored password.".to_string()
                }
                ApiError::Forbidden(text)
                | ApiError::NotFound(text)
                | ApiError::ServerError(text)
                | ApiError::Rejected(text) => text.clone(),
                ApiError::Network(_) => {
                    "Connection failed. Please check the server URL and your network.".to_string()
                }
                ApiError::InvalidUrl(url) => format!("Invalid server URL: {}", url),
                ApiError::Keyring(_) => {
                    "Could not access secure storage. Run 'resumedeck set-password' again."
                        .to_string()
                }
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from the server.".to_string()
                }
                ApiError::LoginFailed(msg) => format!("Login failed: {}", msg),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ValidationError(_))
            | AppError::Config(ConfigError::ParseError(_)) => {
                Some("Fix the profile entries in config.toml.")
            }
            AppError::Api(ApiError::Unauthorized) | AppError::Api(ApiError::LoginFailed(_)) => {
                Some("Run 'resumedeck set-password' to update the stored password.")
            }
            AppError::Api(ApiError::Network(_)) => Some("Check that the server is running."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
