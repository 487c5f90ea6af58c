//! Token refresher backed by a preconfigured secret.

use async_trait::async_trait;

use super::AccessToken;
use crate::error::AuthError;
use crate::traits::TokenRefresher;

/// Default validity window for statically supplied tokens.
const DEFAULT_TTL_SECS: i64 = 60 * 60;

/// [`TokenRefresher`] that hands out the same preconfigured secret with a
/// rolling TTL. Used by the CLI, where the credential comes from the
/// environment, and by tests.
#[derive(Debug, Clone)]
pub struct StaticTokenRefresher {
    token: String,
    ttl_secs: i64,
}

impl StaticTokenRefresher {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    pub fn with_ttl(token: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            token: token.into(),
            ttl_secs,
        }
    }
}

#[async_trait]
impl TokenRefresher for StaticTokenRefresher {
    async fn refresh_token(&self) -> Result<AccessToken, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(AccessToken::with_ttl(self.token.clone(), self.ttl_secs))
    }
}
