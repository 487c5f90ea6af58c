//! Error category classification for unified error handling.
//!
//! Provides a high-level categorization of errors to enable consistent
//! retry policies and user messaging.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, timeout).
    /// Generally transient and retryable.
    Network,

    /// Authentication/authorization errors.
    /// May require a token refresh or re-authentication.
    Auth,

    /// Backend/server-side errors (HTTP 5xx, overload).
    /// Generally transient and retryable after a delay.
    Server,

    /// Client-side errors (malformed data, invalid state).
    /// Not retryable - indicates a protocol or programming error.
    Client,

    /// User action required (missing configuration, bad input).
    User,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Refresh your access token and try again",
            ErrorCategory::Server => "The service may be overloaded. Please try again later",
            ErrorCategory::Client => "This looks like a bug. Please report it",
            ErrorCategory::User => "Check your configuration and input",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
