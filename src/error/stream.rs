//! Streaming-related error types.
//!
//! Defines the failure classifications a single streamed conversation
//! request can end with. Where the stream already produced data before
//! failing, the error carries the best-known partial response so callers
//! can still surface it.

use std::fmt;

use crate::models::PartialResponse;

/// Stream-specific error variants.
#[derive(Debug, Clone)]
pub enum StreamError {
    /// An event payload failed to parse as JSON mid-stream.
    MalformedPayload {
        message: String,
        partial: Option<PartialResponse>,
    },

    /// The connection was lost before the terminal sentinel arrived and
    /// the failure did not match the benign-truncation pattern.
    ConnectionLost {
        message: String,
        partial: Option<PartialResponse>,
    },

    /// The configured deadline elapsed before the stream resolved.
    Timeout {
        elapsed_ms: u64,
        partial: Option<PartialResponse>,
    },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::ConnectionLost { .. } | StreamError::Timeout { .. }
        )
    }

    /// The best-known partial response recorded before the failure, if any.
    pub fn partial(&self) -> Option<&PartialResponse> {
        match self {
            StreamError::MalformedPayload { partial, .. }
            | StreamError::ConnectionLost { partial, .. }
            | StreamError::Timeout { partial, .. } => partial.as_ref(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::MalformedPayload { .. } => {
                "Received invalid data from the server. Please try again.".to_string()
            }
            StreamError::ConnectionLost { .. } => {
                "Connection to the server was lost before the answer completed.".to_string()
            }
            StreamError::Timeout { elapsed_ms, .. } => {
                format!(
                    "No complete answer after {} ms. The connection may have been lost.",
                    elapsed_ms
                )
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::MalformedPayload { .. } => "E_STREAM_PARSE",
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::MalformedPayload { message, .. } => {
                write!(f, "Malformed event payload: {}", message)
            }
            StreamError::ConnectionLost { message, .. } => {
                write!(f, "Stream connection lost: {}", message)
            }
            StreamError::Timeout { elapsed_ms, .. } => {
                write!(f, "Stream timed out after {} ms", elapsed_ms)
            }
        }
    }
}

impl std::error::Error for StreamError {}
