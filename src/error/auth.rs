//! Authentication-related error types.

use std::fmt;

/// Authentication/authorization error variants.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No credential is available and no refresher could supply one.
    MissingCredentials,

    /// The cached token's TTL elapsed.
    TokenExpired,

    /// The backend rejected the credential (401 or 403).
    Unauthorized {
        status: u16,
    },

    /// The external refresher failed to produce a new token.
    RefreshFailed {
        message: String,
    },
}

impl AuthError {
    /// Check whether a fresh credential would likely resolve this error.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::TokenExpired | AuthError::Unauthorized { .. }
        )
    }

    /// Check whether the error can be recovered from without user action.
    pub fn is_recoverable(&self) -> bool {
        self.requires_reauth()
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingCredentials => {
                "No access token is configured. Please supply a credential.".to_string()
            }
            AuthError::TokenExpired => {
                "Your access token has expired. It will be refreshed on the next request."
                    .to_string()
            }
            AuthError::Unauthorized { status } => {
                format!(
                    "The server rejected your credential (HTTP {}). Please re-authenticate.",
                    status
                )
            }
            AuthError::RefreshFailed { message } => {
                format!("Could not refresh the access token: {}", message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "E_AUTH_MISSING",
            AuthError::TokenExpired => "E_AUTH_EXPIRED",
            AuthError::Unauthorized { .. } => "E_AUTH_DENIED",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "No credentials available"),
            AuthError::TokenExpired => write!(f, "Access token expired"),
            AuthError::Unauthorized { status } => {
                write!(f, "Authorization denied (HTTP {})", status)
            }
            AuthError::RefreshFailed { message } => {
                write!(f, "Token refresh failed: {}", message)
            }
        }
    }
}

impl std::error::Error for AuthError {}
