//! Time-bound access token cache.
//!
//! Holds at most one bearer credential at a time. A token is valid until
//! its expiry timestamp; reads past expiry come back empty, forcing the
//! caller to refresh through the external authentication collaborator.
//! An explicit invalidation (after an authorization-denied response)
//! empties the slot even when the TTL has not elapsed.

use std::sync::RwLock;

/// A bearer credential with its expiry as a Unix timestamp (seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: i64,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: i64) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Build a token expiring `ttl_secs` from now.
    pub fn with_ttl(value: impl Into<String>, ttl_secs: i64) -> Self {
        Self::new(value, chrono::Utc::now().timestamp() + ttl_secs)
    }

    /// A token is expired from the instant `now >= expires_at`.
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.expires_at
    }
}

/// Single-slot token cache with concurrent reads and atomic-replace
/// writes. Writes overwrite, never append.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, or `None` when the slot is empty or the token
    /// has expired.
    pub fn get(&self) -> Option<AccessToken> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().filter(|token| !token.is_expired()).cloned()
    }

    /// Cache a token, replacing any previous one. Refresh is idempotent:
    /// any fresher token is acceptable.
    pub fn set(&self, token: AccessToken) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token);
    }

    /// Cache a raw credential value valid for `ttl_secs` from now.
    pub fn set_with_ttl(&self, value: impl Into<String>, ttl_secs: i64) {
        self.set(AccessToken::with_ttl(value, ttl_secs));
    }

    /// Empty the slot regardless of TTL, forcing a refresh on next use.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}
