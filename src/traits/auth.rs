//! Authentication collaborator trait.
//!
//! The token cache itself is in-process state; producing a fresh bearer
//! credential is an external concern (an auth service, a browser session,
//! a static secret). This trait is that seam.

use async_trait::async_trait;

use crate::auth::AccessToken;
use crate::error::AuthError;

/// Supplier of fresh access tokens.
///
/// Consulted by the client whenever the [`TokenCache`] comes up empty -
/// on first use, past TTL, or after an explicit invalidation following an
/// authorization-denied response.
///
/// [`TokenCache`]: crate::auth::TokenCache
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Produce a fresh token, or explain why one cannot be obtained.
    async fn refresh_token(&self) -> Result<AccessToken, AuthError>;
}
