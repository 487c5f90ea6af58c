//! Transport abstraction for streamed response bodies.
//!
//! Normalizes the two stream shapes the client deals with - a pull-based
//! reader (an HTTP response body) and a push-based emitter (a channel fed
//! by another task) - into one "next chunk or done" interface, enabling
//! dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::NetworkError;

/// Source of ordered raw byte chunks for one streamed response.
///
/// Implementations only supply byte ranges in order; decoding chunk
/// boundaries is the decoder's job. Once the underlying transport
/// completes, `next_chunk` returns `Ok(None)` and keeps doing so.
///
/// # Example
///
/// ```ignore
/// use parlance::traits::ChunkSource;
///
/// async fn drain<S: ChunkSource>(mut source: S) {
///     while let Ok(Some(chunk)) = source.next_chunk().await {
///         println!("{} bytes", chunk.len());
///     }
/// }
/// ```
#[async_trait]
pub trait ChunkSource: Send {
    /// Await the next chunk.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - the next ordered chunk
    /// - `Ok(None)` - the stream completed (reported once, then sticky)
    /// - `Err(error)` - the transport failed
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, NetworkError>;

    /// Cooperative cancellation hook.
    ///
    /// Stops the source from awaiting further chunks and releases the
    /// underlying connection. Idempotent; after cancellation `next_chunk`
    /// returns `Ok(None)`.
    fn cancel(&mut self);
}
