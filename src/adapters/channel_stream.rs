//! Push-based chunk source fed through a channel.
//!
//! Some response bodies arrive as push-style emitters (another task reads
//! them and notifies on data-ready) rather than as a pollable reader.
//! This adapter normalizes that shape: the emitter pushes chunks into the
//! sender half, and the receiver half behaves like any other
//! [`ChunkSource`].

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::NetworkError;
use crate::traits::ChunkSource;

/// Sender half handed to the emitting task.
pub type ChunkSender = mpsc::Sender<Result<Bytes, NetworkError>>;

/// Create a connected sender/source pair.
pub fn chunk_channel(buffer: usize) -> (ChunkSender, ChannelChunkSource) {
    let (tx, rx) = mpsc::channel(buffer);
    (tx, ChannelChunkSource { rx, done: false })
}

/// [`ChunkSource`] over a channel of pushed chunks.
///
/// Completion is signaled by dropping the sender; errors are pushed
/// in-band. Either way, done is reported exactly once and is sticky.
pub struct ChannelChunkSource {
    rx: mpsc::Receiver<Result<Bytes, NetworkError>>,
    done: bool,
}

#[async_trait]
impl ChunkSource for ChannelChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, NetworkError> {
        if self.done {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(err)) => {
                self.done = true;
                Err(err)
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    fn cancel(&mut self) {
        self.rx.close();
        self.done = true;
    }
}
