//! Error types used throughout the SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the panel SDK
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum XuiError {
    /// A call that needs a session was made before `login()`.
    #[error("Before making a request to the panel, you must use the login() method")]
    AuthRequired,

    /// Connection refused, DNS failure or timeout on every attempt.
    #[error("Network unreachable after {attempts} attempts: {message}")]
    TransientNetwork { attempts: usize, message: String },

    /// The panel answered with `success: false`.
    #[error("Response status is not successful, message: {message}")]
    RemoteOperation { message: String },

    /// The login call went through but no session cookie came back.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Non-transient transport failure (TLS, malformed request, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of [`XuiError`] for callers that branch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No session, or the login handshake did not yield one
    Authentication,
    /// Connection-level failure that exhausted the retry budget
    Network,
    /// The panel rejected the operation
    Remote,
    /// HTTP status or transport failure outside the retry policy
    Http,
    /// Local problems: configuration, files, encoding
    Local,
}

impl XuiError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthRequired | Self::LoginFailed(_) => ErrorCategory::Authentication,
            Self::TransientNetwork { .. } => ErrorCategory::Network,
            Self::RemoteOperation { .. } => ErrorCategory::Remote,
            Self::Http { .. } | Self::Transport(_) | Self::InvalidResponse(_) => {
                ErrorCategory::Http
            }
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ErrorCategory::Local,
        }
    }

    /// Whether a fresh call may succeed where this one failed.
    ///
    /// Only transient network failures qualify; the dispatcher has already
    /// spent its own retry budget on them.
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network)
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, XuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(XuiError::AuthRequired.category(), ErrorCategory::Authentication);
        assert_eq!(
            XuiError::LoginFailed("no cookie".into()).category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            XuiError::TransientNetwork { attempts: 3, message: "refused".into() }.category(),
            ErrorCategory::Network
        );
        assert_eq!(
            XuiError::RemoteOperation { message: "nope".into() }.category(),
            ErrorCategory::Remote
        );
        assert_eq!(
            XuiError::Http { status: 502, message: "bad gateway".into() }.category(),
            ErrorCategory::Http
        );
        assert_eq!(XuiError::Config("x".into()).category(), ErrorCategory::Local);
    }

    #[test]
    fn test_only_transient_network_is_retryable() {
        assert!(XuiError::TransientNetwork { attempts: 3, message: "dns".into() }.is_retryable());
        assert!(!XuiError::AuthRequired.is_retryable());
        assert!(!XuiError::RemoteOperation { message: "x".into() }.is_retryable());
        assert!(!XuiError::Http { status: 500, message: "x".into() }.is_retryable());
        assert!(!XuiError::Transport("tls".into()).is_retryable());
    }

    #[test]
    fn test_remote_operation_keeps_message_verbatim() {
        let err = XuiError::RemoteOperation { message: "Inbound not found".into() };
        assert_eq!(err.to_string(), "Response status is not successful, message: Inbound not found");
    }

    #[test]
    fn test_status_only_for_http() {
        assert_eq!(XuiError::Http { status: 404, message: String::new() }.status(), Some(404));
        assert_eq!(XuiError::Transport("x".into()).status(), None);
    }

    #[test]
    fn test_error_serializes_with_type_tag() {
        let json = serde_json::to_value(XuiError::AuthRequired).unwrap();
        assert_eq!(json["type"], "AuthRequired");
    }
}
