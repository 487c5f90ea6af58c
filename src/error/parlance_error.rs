//! Unified error type for the parlance client.
//!
//! `ParlanceError` consolidates the domain-specific error types into a
//! single enum, providing consistent categorization, retry logic, and
//! user messaging.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::models::PartialResponse;

/// Unified error type for the parlance client.
#[derive(Debug, Clone)]
pub enum ParlanceError {
    /// Network-related errors (connections, HTTP, timeouts).
    Network(NetworkError),

    /// Authentication/authorization errors.
    Auth(AuthError),

    /// Stream/SSE processing errors.
    Stream(StreamError),
}

impl ParlanceError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParlanceError::Network(err) => match err {
                NetworkError::AtCapacity { .. } => ErrorCategory::Server,
                NetworkError::HttpStatus { status, .. } if *status >= 500 => {
                    ErrorCategory::Server
                }
                _ => ErrorCategory::Network,
            },
            ParlanceError::Auth(_) => ErrorCategory::Auth,
            ParlanceError::Stream(err) => match err {
                StreamError::MalformedPayload { .. } => ErrorCategory::Client,
                StreamError::ConnectionLost { .. } | StreamError::Timeout { .. } => {
                    ErrorCategory::Network
                }
            },
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ParlanceError::Network(err) => err.is_retryable(),
            ParlanceError::Auth(err) => err.is_recoverable(),
            ParlanceError::Stream(err) => err.is_retryable(),
        }
    }

    /// Check if this error requires re-authentication.
    pub fn requires_reauth(&self) -> bool {
        match self {
            ParlanceError::Auth(err) => err.requires_reauth(),
            ParlanceError::Network(NetworkError::HttpStatus { status, .. }) => {
                *status == 401 || *status == 403
            }
            _ => false,
        }
    }

    /// The best-known partial response recorded before the failure, if any.
    pub fn partial(&self) -> Option<&PartialResponse> {
        match self {
            ParlanceError::Stream(err) => err.partial(),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ParlanceError::Network(err) => err.user_message(),
            ParlanceError::Auth(err) => err.user_message(),
            ParlanceError::Stream(err) => err.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ParlanceError::Network(err) => err.error_code(),
            ParlanceError::Auth(err) => err.error_code(),
            ParlanceError::Stream(err) => err.error_code(),
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ParlanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParlanceError::Network(err) => write!(f, "{}", err),
            ParlanceError::Auth(err) => write!(f, "{}", err),
            ParlanceError::Stream(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParlanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParlanceError::Network(err) => Some(err),
            ParlanceError::Auth(err) => Some(err),
            ParlanceError::Stream(err) => Some(err),
        }
    }
}

impl From<NetworkError> for ParlanceError {
    fn from(err: NetworkError) -> Self {
        ParlanceError::Network(err)
    }
}

impl From<AuthError> for ParlanceError {
    fn from(err: AuthError) -> Self {
        ParlanceError::Auth(err)
    }
}

impl From<StreamError> for ParlanceError {
    fn from(err: StreamError) -> Self {
        ParlanceError::Stream(err)
    }
}

impl From<serde_json::Error> for ParlanceError {
    fn from(err: serde_json::Error) -> Self {
        ParlanceError::Stream(StreamError::MalformedPayload {
            message: err.to_string(),
            partial: None,
        })
    }
}

impl From<reqwest::Error> for ParlanceError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        ParlanceError::Network(super::network::classify_reqwest_error(&err, &url))
    }
}
