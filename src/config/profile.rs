//! Server profile configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// A resume server profile.
///
/// Passwords are never written to the config file; they live in the OS
/// keyring under the profile name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles.
    pub name: String,

    /// The server root URL (e.g., "http://localhost:5000").
    pub url: String,

    /// Login name. Profiles without one connect anonymously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Profile {
    /// Create a new profile.
    pub fn new(name: String, url: String, username: Option<String>) -> Self {
        Self {
            name,
            url,
            username,
        }
    }

    /// Validate this profile.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL cannot be empty",
                self.name
            )));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL must start with http:// or https://",
                self.name
            )));
        }

        if matches!(&self.username, Some(u) if u.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': username cannot be blank",
                self.name
            )));
        }

        Ok(())
    }
}
