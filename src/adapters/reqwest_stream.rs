//! Pull-based chunk source over a reqwest response body.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use std::pin::Pin;
use tracing::debug;

use crate::error::{classify_reqwest_error, NetworkError};
use crate::traits::ChunkSource;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// [`ChunkSource`] over a streaming HTTP response.
///
/// Pulls chunks from `Response::bytes_stream()`. Cancellation drops the
/// stream, which releases the underlying connection; afterwards
/// `next_chunk` reports done.
pub struct ReqwestChunkSource {
    stream: Option<ByteStream>,
    url: String,
}

impl ReqwestChunkSource {
    /// Wrap a response whose status has already been checked.
    pub fn new(response: reqwest::Response) -> Self {
        let url = response.url().to_string();
        Self {
            stream: Some(Box::pin(response.bytes_stream())),
            url,
        }
    }
}

#[async_trait]
impl ChunkSource for ReqwestChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, NetworkError> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };
        match stream.next().await {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(err)) => Err(classify_reqwest_error(&err, &self.url)),
            None => {
                self.stream = None;
                Ok(None)
            }
        }
    }

    fn cancel(&mut self) {
        if self.stream.take().is_some() {
            debug!(url = %self.url, "cancelled response stream");
        }
    }
}
