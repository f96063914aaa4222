//! Error types for Scopechat
//!
//! This module defines the error taxonomy used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Two families exist:
//!
//! - [`ScopechatError`] covers failures that propagate to the caller, such as
//!   configuration problems or a missing API credential at startup.
//! - [`BackendCallError`] covers a single failed attempt against the
//!   completion backend. It is always recovered locally by the
//!   [`CompletionClient`](crate::completion::CompletionClient) fallback loop
//!   and never reaches the session layer.

use thiserror::Error;

/// Main error type for Scopechat operations
#[derive(Error, Debug)]
pub enum ScopechatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No credential could be resolved from any configured source
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Conversation history invariant violation
    #[error("Conversation error: {0}")]
    Conversation(String),

    /// Provider-related errors (client construction, unsupported operations)
    #[error("Provider error: {0}")]
    Provider(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Failure of a single completion attempt against one candidate model
///
/// Every variant is treated the same way by the fallback loop: the attempt
/// is abandoned and the next candidate is tried. The variants exist so that
/// logs can tell a dead network apart from a rate limit or a bad payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendCallError {
    /// The request never produced an HTTP response
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success status code
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as returned by the backend
        body: String,
    },

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The response decoded but carried no usable choice
    #[error("response contained no choices")]
    EmptyChoices,
}

/// Result type alias for Scopechat operations
///
/// Uses `anyhow::Error` as the error type, allowing for rich error context
/// and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ScopechatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = ScopechatError::MissingCredentials("GROQ_API_KEY".to_string());
        assert_eq!(error.to_string(), "Missing credentials: GROQ_API_KEY");
    }

    #[test]
    fn test_conversation_error_display() {
        let error = ScopechatError::Conversation("assistant without user".to_string());
        assert_eq!(
            error.to_string(),
            "Conversation error: assistant without user"
        );
    }

    #[test]
    fn test_provider_error_display() {
        let error = ScopechatError::Provider("client build failed".to_string());
        assert_eq!(error.to_string(), "Provider error: client build failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ScopechatError = io_error.into();
        assert!(matches!(error, ScopechatError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ScopechatError = yaml_error.into();
        assert!(matches!(error, ScopechatError::Yaml(_)));
    }

    #[test]
    fn test_backend_status_error_display() {
        let error = BackendCallError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(error.to_string(), "backend returned status 429: rate limited");
    }

    #[test]
    fn test_backend_empty_choices_display() {
        assert_eq!(
            BackendCallError::EmptyChoices.to_string(),
            "response contained no choices"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScopechatError>();
        assert_send_sync::<BackendCallError>();
    }
}
