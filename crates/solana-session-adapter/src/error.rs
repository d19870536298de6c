/*
[INPUT]:  Error sources (provider SDK, RPC transport, config, serialization)
[OUTPUT]: Structured error types with context and classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the session adapter
#[derive(Error, Debug)]
pub enum SessionError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interactive login failed or was cancelled
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Operation requires a live wallet handle but none is held
    #[error("Wallet not connected, please login first")]
    NotConnected,

    /// Operation requires an authenticated identity but none is held
    #[error("User not authenticated, please login first")]
    NotAuthenticated,

    /// Provider rejected or failed a sign request
    #[error("Signing failed: {0}")]
    Signing(String),

    /// RPC call failed
    #[error("Network error: {0}")]
    Network(String),

    /// Collaborator call exceeded its bounded timeout
    #[error("Operation timed out after {duration}s")]
    Timeout { duration: u64 },

    /// Collaborator returned a response we cannot interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SessionError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SessionError::Network(_)
                | SessionError::Timeout { .. }
                | SessionError::InvalidResponse(_)
        )
    }

    /// Check if error indicates an authentication precondition failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            SessionError::Authentication { .. }
                | SessionError::NotConnected
                | SessionError::NotAuthenticated
        )
    }

    /// Create an authentication error from any displayable cause
    pub fn authentication(message: impl Into<String>) -> Self {
        SessionError::Authentication {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured duration on the error
            SessionError::Timeout { duration: 0 }
        } else {
            SessionError::Network(err.to_string())
        }
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let timeout_err = SessionError::Timeout { duration: 30 };
        assert!(timeout_err.is_retryable());

        let auth_err = SessionError::NotConnected;
        assert!(!auth_err.is_retryable());
    }

    #[test]
    fn test_error_is_auth_error() {
        assert!(SessionError::NotConnected.is_auth_error());
        assert!(SessionError::NotAuthenticated.is_auth_error());
        assert!(SessionError::authentication("cancelled").is_auth_error());
        assert!(!SessionError::Network("refused".to_string()).is_auth_error());
    }

    #[test]
    fn test_error_messages_mention_login() {
        assert!(SessionError::NotConnected.to_string().contains("login"));
        assert!(SessionError::NotAuthenticated.to_string().contains("login"));
    }
}
