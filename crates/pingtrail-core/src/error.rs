//! Error types for pingtrail-core.

use thiserror::Error;

/// Result type alias using pingtrail-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failure, as seen by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    AuthFailure,
    ValidationFailure,
    NotFound,
    Server,
}

/// Core error types for pingtrail operations
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    // Auth errors
    #[error("Authentication failed: {message}")]
    Auth { code: String, message: String },

    // Payload errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Any other non-success status
    #[error("API error {status}: {message}")]
    Server { status: u16, code: String, message: String },
}

impl Error {
    /// Create an auth error carrying the server's error code
    pub fn auth(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::NetworkFailure,
            Error::Auth { .. } => ErrorKind::AuthFailure,
            Error::Validation(_) => ErrorKind::ValidationFailure,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Server { .. } => ErrorKind::Server,
        }
    }

    /// Whether this failure should end the current session.
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::AuthFailure
    }

    /// Message suitable for the `error` field of a store.
    ///
    /// Server-provided messages are shown as-is; anything else falls back to
    /// `fallback` so the UI never renders transport internals.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Auth { message, .. } | Error::Server { message, .. } if !message.is_empty() => {
                message.clone()
            }
            Error::Validation(message) | Error::NotFound(message) if !message.is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::Network("down".into()).kind(), ErrorKind::NetworkFailure);
        assert_eq!(Error::auth("authentication_failed", "no").kind(), ErrorKind::AuthFailure);
        assert_eq!(Error::Validation("bad".into()).kind(), ErrorKind::ValidationFailure);
        assert_eq!(Error::NotFound("/pings/9".into()).kind(), ErrorKind::NotFound);
        assert!(Error::auth("x", "y").is_auth());
        assert!(!Error::Network("x".into()).is_auth());
    }

    #[test]
    fn test_user_message_fallback() {
        let err = Error::Network("connection refused".into());
        assert_eq!(err.user_message("Failed to fetch pings"), "Failed to fetch pings");

        let err = Error::auth("authentication_failed", "No active account found");
        assert_eq!(err.user_message("Login failed"), "No active account found");

        let err = Error::Server {
            status: 500,
            code: "error".into(),
            message: String::new(),
        };
        assert_eq!(err.user_message("Failed to create ping"), "Failed to create ping");
    }
}
