//! Chat client for the conversation API.
//!
//! Issues streaming conversation requests and drives the response
//! pipeline - transport adapter into decoder into aggregator - to a
//! single resolution per request. Bearer credentials come from the
//! [`TokenCache`], refreshed lazily through the configured
//! [`TokenRefresher`].
//!
//! The client reports authorization failures as classifications and
//! invalidates the cache; it does not retry. Retry-after-failure is a
//! caller-level policy.

use std::sync::Arc;

use tracing::debug;

use crate::adapters::{ReqwestChunkSource, Utf8Assembler};
use crate::aggregator::{Resolution, ResponseAggregator};
use crate::auth::TokenCache;
use crate::error::{classify_reqwest_error, AuthError, NetworkError, ParlanceResult};
use crate::models::{AskOptions, ConversationRequest, PartialResponse};
use crate::sse::SseDecoder;
use crate::traits::{ChunkSource, TokenRefresher};

/// Client for the streaming conversation endpoint.
pub struct ChatClient {
    /// Base URL of the backend API, without a trailing slash.
    pub base_url: String,
    /// Reusable HTTP client.
    http: reqwest::Client,
    tokens: TokenCache,
    refresher: Arc<dyn TokenRefresher>,
}

impl ChatClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self::with_http_client(base_url, refresher, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client (timeouts, proxies,
    /// connection pools).
    pub fn with_http_client(
        base_url: impl Into<String>,
        refresher: Arc<dyn TokenRefresher>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            tokens: TokenCache::new(),
            refresher,
        }
    }

    /// The client's token cache.
    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Send one user message and aggregate the streamed answer.
    ///
    /// Resolves exactly once per call: with the final answer on the
    /// `[DONE]` sentinel, stream completion, or benign truncation; with a
    /// failure classification otherwise. The best-known partial response
    /// rides along on stream failures.
    pub async fn send_message(
        &self,
        text: &str,
        options: AskOptions,
    ) -> ParlanceResult<PartialResponse> {
        let token = self.bearer_token().await?;
        let request = ConversationRequest::new(text, &options);
        let url = format!("{}/conversation", self.base_url);

        debug!(%url, conversation_id = ?request.conversation_id, "sending conversation request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;

        let status = response.status().as_u16();
        match status {
            401 | 403 => {
                debug!(status, "authorization denied; invalidating cached token");
                self.tokens.invalidate();
                return Err(AuthError::Unauthorized { status }.into());
            }
            429 => {
                let retry_after_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse().ok());
                return Err(NetworkError::AtCapacity { retry_after_secs }.into());
            }
            s if !(200..300).contains(&s) => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(NetworkError::HttpStatus { status: s, message }.into());
            }
            _ => {}
        }

        let source = ReqwestChunkSource::new(response);
        let aggregator = match options.on_progress {
            Some(callback) => ResponseAggregator::with_progress(callback),
            None => ResponseAggregator::new(),
        };
        stream_to_resolution(source, aggregator, options.timeout)
            .await
            .into_result()
    }

    /// A valid bearer token, from the cache or freshly refreshed.
    async fn bearer_token(&self) -> ParlanceResult<String> {
        if let Some(token) = self.tokens.get() {
            return Ok(token.value);
        }
        debug!("access token missing or expired; refreshing");
        let token = self.refresher.refresh_token().await?;
        self.tokens.set(token.clone());
        Ok(token.value)
    }
}

/// Drive a chunk source through decode and aggregation to one terminal
/// resolution.
///
/// Processing is push-driven: each chunk is decoded and applied
/// synchronously, and the only suspension points are waiting for the next
/// chunk and the optional deadline racing against it. When the deadline
/// elapses the source's cancellation hook is invoked exactly once before
/// the timeout classification is returned.
pub async fn stream_to_resolution<S: ChunkSource>(
    mut source: S,
    mut aggregator: ResponseAggregator,
    timeout: Option<std::time::Duration>,
) -> Resolution {
    let started = std::time::Instant::now();
    let deadline = timeout.map(|t| tokio::time::Instant::now() + t);
    let mut assembler = Utf8Assembler::new();
    let mut decoder = SseDecoder::new();

    loop {
        let chunk = match deadline {
            Some(at) => match tokio::time::timeout_at(at, source.next_chunk()).await {
                Ok(chunk) => chunk,
                Err(_) => {
                    source.cancel();
                    return aggregator.finish_timed_out(started.elapsed());
                }
            },
            None => source.next_chunk().await,
        };

        match chunk {
            Ok(Some(bytes)) => {
                let text = assembler.push(&bytes);
                if text.is_empty() {
                    continue;
                }
                let mut terminal = None;
                decoder.feed_with(&text, &mut |event| {
                    if terminal.is_none() {
                        terminal = aggregator.handle_event(&event);
                    }
                });
                if let Some(resolution) = terminal {
                    source.cancel();
                    return resolution;
                }
            }
            Ok(None) => return aggregator.finish_eof(),
            Err(error) => return aggregator.finish_transport_error(error),
        }
    }
}
