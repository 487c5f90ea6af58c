//! Unified error handling architecture for parlance.
//!
//! This module provides:
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Domain-specific Errors**: Network, Auth, and Stream errors
//! - **Unified Error Type**: [`ParlanceError`] consolidates all error types
//! - **Result Type Alias**: [`ParlanceResult<T>`] for consistent return types
//!
//! Each domain error exposes `is_retryable()`, `user_message()`, and
//! `error_code()` so callers can drive retry policy and logging without
//! matching on variants.
//!
//! # Example
//!
//! ```ignore
//! use parlance::error::{ParlanceError, ParlanceResult};
//!
//! match client.send_message("Hello", options).await {
//!     Ok(response) => println!("{}", response.text),
//!     Err(err) => {
//!         eprintln!("[{}] {}", err.error_code(), err.user_message());
//!         if err.is_retryable() {
//!             eprintln!("Hint: {}", err.recovery_hint());
//!         }
//!     }
//! }
//! ```

mod auth;
mod category;
mod network;
mod parlance_error;
mod stream;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use network::{classify_reqwest_error, matches_truncation_signature, NetworkError};
pub use parlance_error::ParlanceError;
pub use stream::StreamError;

/// Result type alias using the unified error.
pub type ParlanceResult<T> = Result<T, ParlanceError>;
