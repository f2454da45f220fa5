//! Error types for the tutor API client

use thiserror::Error;

/// Errors that can occur when talking to the tutor backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// No access token is available for an authenticated endpoint
    #[error("Not signed in. Log in first")]
    NotAuthenticated,

    /// The configured API root is not a usable base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Backend answered with an error envelope
    #[error("API error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// `error.message` from the envelope
        message: String,
    },

    /// Backend answered with a failure status and no readable envelope
    #[error("Request failed with status {0}")]
    StatusError(u16),

    /// Success envelope without a `data` field
    #[error("Response contained no data")]
    MissingData,

    /// The request was cancelled before it settled
    #[error("Request cancelled")]
    Cancelled,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ApiError {
    /// The human-readable message supplied by the backend, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Message to show the user: the backend's own message, else `fallback`
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Check if this error requires re-authentication
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            ApiError::NotAuthenticated
                | ApiError::ServerError { status: 401, .. }
                | ApiError::StatusError(401)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_preferred_over_fallback() {
        let err = ApiError::ServerError { status: 400, message: "Invalid credentials".into() };
        assert_eq!(err.message_or("Login failed"), "Invalid credentials");
    }

    #[test]
    fn fallback_used_without_envelope() {
        assert_eq!(ApiError::StatusError(502).message_or("Login failed"), "Login failed");
        assert_eq!(ApiError::MissingData.message_or("Failed to fetch courses"), "Failed to fetch courses");
    }

    #[test]
    fn unauthorized_requires_reauth() {
        assert!(ApiError::StatusError(401).requires_reauth());
        assert!(ApiError::ServerError { status: 401, message: "expired".into() }.requires_reauth());
        assert!(!ApiError::StatusError(404).requires_reauth());
    }
}
