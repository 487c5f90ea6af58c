//! Credential caching for the conversation API.
//!
//! The cache owns the single bearer-credential slot; producing fresh
//! tokens is delegated to a [`TokenRefresher`] implementation.
//!
//! [`TokenRefresher`]: crate::traits::TokenRefresher

mod static_refresher;
mod token_cache;

pub use static_refresher::StaticTokenRefresher;
pub use token_cache::{AccessToken, TokenCache};
