//! Network-related error types.
//!
//! Defines errors that occur while issuing requests and reading response
//! bodies, plus the classification helpers that map transport failures
//! onto them. This includes the benign-truncation check: the backend is
//! known to drop connections abruptly after the full answer has been
//! delivered, and those failures are recognized by message signature.

use std::fmt;

/// Connection-level failure signatures that occur after the backend has
/// already delivered the complete logical answer. Matched case-insensitively
/// against the error message.
const BENIGN_TRUNCATION_SIGNATURES: &[&str] = &[
    "connection reset by peer",
    "connection closed before message completed",
    "unexpected eof",
    "unexpected end of file",
    "premature close",
    "incomplete message",
    "broken pipe",
];

/// Network-specific error variants.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed {
        url: String,
        message: String,
    },

    /// Request timed out at the HTTP layer.
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// HTTP status error (non-2xx response).
    HttpStatus {
        status: u16,
        message: String,
    },

    /// Upstream is overloaded and refusing new conversations.
    AtCapacity {
        retry_after_secs: Option<u64>,
    },

    /// Invalid response format.
    InvalidResponse {
        message: String,
    },

    /// Request was cancelled.
    Cancelled,

    /// Generic network error.
    Other {
        message: String,
    },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::AtCapacity { .. } => true,
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Check whether this failure matches the known benign-truncation
    /// pattern: a connection terminated by the peer in a way observed to
    /// happen only after complete delivery. Whether the truncation is
    /// actually treated as success additionally requires that partial
    /// data was recorded, which the aggregator decides.
    pub fn is_benign_truncation(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { message, .. }
            | NetworkError::InvalidResponse { message }
            | NetworkError::Other { message } => matches_truncation_signature(message),
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { operation, duration_ms } => {
                format!(
                    "The {} operation timed out after {} ms. The server may be slow or unreachable.",
                    operation, duration_ms
                )
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 => "Authentication required. Please refresh your access token.".to_string(),
                403 => "Access denied. Your session may have expired.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}). Please try again.", status),
            },
            NetworkError::AtCapacity { retry_after_secs } => match retry_after_secs {
                Some(secs) => format!(
                    "The service is at capacity. Please wait {} seconds before trying again.",
                    secs
                ),
                None => "The service is at capacity. Please wait a moment and try again."
                    .to_string(),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::AtCapacity { .. } => "E_NET_CAPACITY",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { operation, duration_ms } => {
                write!(f, "{} timed out after {} ms", operation, duration_ms)
            }
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::AtCapacity { retry_after_secs } => match retry_after_secs {
                Some(secs) => write!(f, "Service at capacity, retry after {} seconds", secs),
                None => write!(f, "Service at capacity"),
            },
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Check a raw error message against the benign-truncation signatures.
pub fn matches_truncation_signature(message: &str) -> bool {
    let lowered = message.to_lowercase();
    BENIGN_TRUNCATION_SIGNATURES
        .iter()
        .any(|sig| lowered.contains(sig))
}

/// Classify a reqwest error into a NetworkError.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> NetworkError {
    if err.is_connect() {
        NetworkError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        NetworkError::Timeout {
            operation: "HTTP request".to_string(),
            duration_ms: 30_000, // reqwest does not expose the configured timeout
        }
    } else if err.is_status() {
        match err.status() {
            Some(status) if status.as_u16() == 429 => NetworkError::AtCapacity {
                retry_after_secs: None,
            },
            Some(status) => NetworkError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => NetworkError::HttpStatus {
                status: 0,
                message: err.to_string(),
            },
        }
    } else if err.is_decode() {
        NetworkError::InvalidResponse {
            message: format!("Failed to decode response: {}", err),
        }
    } else {
        NetworkError::Other {
            message: err.to_string(),
        }
    }
}
