//! Mock chunk source for testing.
//!
//! Provides a scripted [`ChunkSource`] that replays configured chunks and
//! failures without any network, and records cancellations so tests can
//! assert the cancellation hook fired exactly once.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::NetworkError;
use crate::traits::ChunkSource;

/// A scripted chunk source.
///
/// Replays its steps in order; once exhausted it either reports done or,
/// with `hang_when_drained`, parks forever - useful for deadline tests.
///
/// # Example
///
/// ```ignore
/// use parlance::adapters::mock::ScriptedChunkSource;
///
/// let source = ScriptedChunkSource::new(["data: {\"x\":1}\n\n"])
///     .then_error(NetworkError::Cancelled);
/// let cancels = source.cancel_count();
/// ```
pub struct ScriptedChunkSource {
    steps: VecDeque<Result<Bytes, NetworkError>>,
    hang_when_drained: bool,
    cancelled: bool,
    cancel_count: Arc<AtomicUsize>,
}

impl ScriptedChunkSource {
    /// Script a source from text chunks.
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            steps: chunks
                .into_iter()
                .map(|chunk| Ok(Bytes::copy_from_slice(chunk.as_ref().as_bytes())))
                .collect(),
            hang_when_drained: false,
            cancelled: false,
            cancel_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script a source from raw byte chunks.
    pub fn from_bytes<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            steps: chunks.into_iter().map(|chunk| Ok(Bytes::from(chunk))).collect(),
            hang_when_drained: false,
            cancelled: false,
            cancel_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Append a transport failure after the scripted chunks.
    pub fn then_error(mut self, error: NetworkError) -> Self {
        self.steps.push_back(Err(error));
        self
    }

    /// Park forever once the scripted chunks are drained, instead of
    /// reporting done.
    pub fn hang_when_drained(mut self) -> Self {
        self.hang_when_drained = true;
        self
    }

    /// Handle for asserting how many times `cancel` was invoked.
    pub fn cancel_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.cancel_count)
    }
}

#[async_trait]
impl ChunkSource for ScriptedChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, NetworkError> {
        if self.cancelled {
            return Ok(None);
        }
        match self.steps.pop_front() {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(err)) => Err(err),
            None => {
                if self.hang_when_drained {
                    futures::future::pending::<()>().await;
                    unreachable!("pending future resolved");
                }
                Ok(None)
            }
        }
    }

    fn cancel(&mut self) {
        self.cancelled = true;
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
    }
}
