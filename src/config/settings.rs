//! Application settings configuration.

use serde::{Deserialize, Serialize};

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The name of the default profile to use.
    pub default_profile: Option<String>,
    /// Path segment the resume endpoints are mounted under.
    pub resumes_path: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Event loop tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            resumes_path: "resumes".to_string(),
            request_timeout_secs: 30,
            tick_rate_ms: 100,
        }
    }
}
