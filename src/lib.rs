//! parlance - streaming chat client for an SSE-based conversational backend.
//!
//! The pipeline for one request: a transport adapter supplies ordered
//! byte chunks, the SSE decoder turns them into events, and the response
//! aggregator folds those events into a single resolved answer, under an
//! optional deadline with cooperative cancellation.

pub mod adapters;
pub mod aggregator;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod prelude;
pub mod sse;
pub mod traits;
