//! API error types for the resume client.

use thiserror::Error;

/// Errors that can occur when talking to the resume server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The session is not logged in, or the credentials were rejected.
    #[error("Authentication failed: check your username and password")]
    Unauthorized,

    /// The server refused access to the resource.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Keyring error when storing/retrieving passwords.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// The response body did not have the expected shape.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The login form was rejected.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// A submitted form was answered in place with an error page.
    #[error("Form rejected: {0}")]
    Rejected(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code and the response body.
    ///
    /// The body is kept verbatim; an empty body falls back to the status line.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let text = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body.trim().to_string()
        };

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(text),
            404 => ApiError::NotFound(text),
            _ => ApiError::ServerError(text),
        }
    }

    /// The text the server reported for this failure.
    ///
    /// For status errors this is the raw response body; other errors use
    /// their display text.
    pub fn response_text(&self) -> String {
        match self {
            ApiError::Forbidden(text)
            | ApiError::NotFound(text)
            | ApiError::ServerError(text)
            | ApiError::Rejected(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_from_status_401() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "nope");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_error_from_status_404_keeps_body() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "not found\n");
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_error_from_status_500() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while deleting the resume: boom",
        );
        assert!(matches!(err, ApiError::ServerError(_)));
        assert!(err.response_text().contains("boom"));
    }

    #[test]
    fn test_empty_body_uses_status() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.response_text(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_response_text_of_non_status_error() {
        let err = ApiError::InvalidResponse("bad json".to_string());
        assert_eq!(err.response_text(), "Invalid API response: bad json");
    }

    #[test]
    fn test_rejected_keeps_server_text() {
        let err = ApiError::Rejected("Error: Form validation failed.".to_string());
        assert_eq!(err.response_text(), "Error: Form validation failed.");
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Resume not found".to_string());
        assert_eq!(err.to_string(), "Not found: Resume not found");
    }
}
