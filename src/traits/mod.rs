//! Trait abstractions for dependency injection.
//!
//! These traits decouple the streaming core from its collaborators:
//! [`ChunkSource`] abstracts where response bytes come from, and
//! [`TokenRefresher`] abstracts how fresh credentials are obtained.
//! Production implementations live in `crate::adapters` and
//! `crate::auth`; test doubles in `crate::adapters::mock`.

pub mod auth;
pub mod transport;

pub use auth::TokenRefresher;
pub use transport::ChunkSource;
