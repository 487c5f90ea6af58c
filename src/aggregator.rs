//! Bounded-wait response aggregation.
//!
//! Consumes decoded [`StreamEvent`]s for one logical request and builds a
//! single resolution out of them: the terminal `[DONE]` sentinel, stream
//! completion, a transport failure, or a deadline. Exactly one terminal
//! transition happens per request; anything arriving after it is ignored,
//! since the decoder may still be draining a buffered tail.
//!
//! The backend resends the whole partial message on every event rather
//! than a delta, so the aggregated text is replaced per event, never
//! appended.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{NetworkError, ParlanceError, ParlanceResult, StreamError};
use crate::models::{PartialResponse, ProgressCallback};
use crate::sse::StreamEvent;

/// Literal payload signaling logical stream completion, distinct from
/// transport-level stream closure.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Lifecycle of one aggregated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    Waiting,
    Resolved,
    Rejected,
    TimedOut,
}

/// Terminal outcome of one aggregated request.
#[derive(Debug)]
pub enum Resolution {
    /// The request produced an answer.
    Complete(PartialResponse),
    /// The request failed with a classification (which may itself carry
    /// the best-known partial response).
    Failed(ParlanceError),
}

impl Resolution {
    /// Convert into the caller-facing result type.
    pub fn into_result(self) -> ParlanceResult<PartialResponse> {
        match self {
            Resolution::Complete(partial) => Ok(partial),
            Resolution::Failed(err) => Err(err),
        }
    }
}

/// Event payload shape streamed by the conversation endpoint.
#[derive(Debug, Deserialize)]
struct ConversationPayload {
    conversation_id: Option<String>,
    message: Option<PayloadMessage>,
}

#[derive(Debug, Deserialize)]
struct PayloadMessage {
    id: Option<String>,
    content: Option<PayloadContent>,
}

#[derive(Debug, Deserialize)]
struct PayloadContent {
    parts: Option<Vec<String>>,
}

/// State machine turning a stream of partial-answer events into one
/// resolution.
///
/// One aggregator per logical request; never shared across streams.
pub struct ResponseAggregator {
    state: AggregatorState,
    partial: PartialResponse,
    reconnect_interval: Option<u64>,
    on_progress: Option<ProgressCallback>,
}

impl Default for ResponseAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self {
            state: AggregatorState::Waiting,
            partial: PartialResponse::default(),
            reconnect_interval: None,
            on_progress: None,
        }
    }

    /// Create an aggregator that reports text updates through `callback`.
    ///
    /// The callback runs synchronously inside the decode loop; it must not
    /// block for unbounded time.
    pub fn with_progress(callback: ProgressCallback) -> Self {
        Self {
            on_progress: Some(callback),
            ..Self::new()
        }
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    /// The best-known partial response so far.
    pub fn partial(&self) -> &PartialResponse {
        &self.partial
    }

    /// Reconnect interval advertised by the stream, if any.
    pub fn reconnect_interval(&self) -> Option<u64> {
        self.reconnect_interval
    }

    /// Process one decoded event in arrival order.
    ///
    /// Returns `Some` on a terminal transition (sentinel or malformed
    /// payload); the caller must stop feeding afterwards. Events arriving
    /// after a terminal transition are ignored.
    pub fn handle_event(&mut self, event: &StreamEvent) -> Option<Resolution> {
        if self.state != AggregatorState::Waiting {
            return None;
        }

        match event {
            StreamEvent::ReconnectInterval { millis } => {
                self.reconnect_interval = Some(*millis);
                None
            }
            StreamEvent::Message { data, .. } => {
                if data.as_str() == DONE_SENTINEL {
                    self.state = AggregatorState::Resolved;
                    return Some(Resolution::Complete(self.partial.clone()));
                }
                match serde_json::from_str::<ConversationPayload>(data) {
                    Ok(payload) => {
                        self.apply_payload(payload);
                        None
                    }
                    Err(err) => {
                        warn!(error = %err, "malformed event payload; rejecting stream");
                        self.state = AggregatorState::Rejected;
                        Some(Resolution::Failed(
                            StreamError::MalformedPayload {
                                message: err.to_string(),
                                partial: self.best_partial(),
                            }
                            .into(),
                        ))
                    }
                }
            }
        }
    }

    /// The underlying stream completed without a sentinel. Resolve with
    /// whatever was accumulated.
    pub fn finish_eof(&mut self) -> Resolution {
        self.state = AggregatorState::Resolved;
        Resolution::Complete(self.partial.clone())
    }

    /// The transport failed. A failure matching the benign-truncation
    /// signature after at least one non-empty partial resolves with that
    /// partial; anything else rejects.
    pub fn finish_transport_error(&mut self, error: NetworkError) -> Resolution {
        if !self.partial.is_empty() && error.is_benign_truncation() {
            debug!(error = %error, "transport failure after data; treating as benign truncation");
            self.state = AggregatorState::Resolved;
            return Resolution::Complete(self.partial.clone());
        }
        self.state = AggregatorState::Rejected;
        Resolution::Failed(
            StreamError::ConnectionLost {
                message: error.to_string(),
                partial: self.best_partial(),
            }
            .into(),
        )
    }

    /// The configured deadline elapsed before any other terminal
    /// transition.
    pub fn finish_timed_out(&mut self, elapsed: std::time::Duration) -> Resolution {
        self.state = AggregatorState::TimedOut;
        Resolution::Failed(
            StreamError::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
                partial: self.best_partial(),
            }
            .into(),
        )
    }

    fn best_partial(&self) -> Option<PartialResponse> {
        if self.partial.is_empty() {
            None
        } else {
            Some(self.partial.clone())
        }
    }

    fn apply_payload(&mut self, payload: ConversationPayload) {
        if let Some(conversation_id) = payload.conversation_id {
            self.partial.conversation_id = Some(conversation_id);
        }
        let Some(message) = payload.message else {
            return;
        };
        if let Some(id) = message.id {
            self.partial.message_id = Some(id);
        }
        let text = message
            .content
            .and_then(|content| content.parts)
            .and_then(|mut parts| if parts.is_empty() { None } else { Some(parts.remove(0)) });
        if let Some(text) = text {
            if !text.is_empty() {
                // Replace, not append: each event carries the full text.
                self.partial.text = text;
                if let Some(callback) = self.on_progress.as_mut() {
                    callback(&self.partial);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn data_event(data: &str) -> StreamEvent {
        StreamEvent::Message {
            id: None,
            event: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn test_text_is_replaced_not_appended() {
        let mut agg = ResponseAggregator::new();
        assert!(agg
            .handle_event(&data_event(r#"{"message":{"content":{"parts":["a"]}}}"#))
            .is_none());
        assert!(agg
            .handle_event(&data_event(r#"{"message":{"content":{"parts":["ab"]}}}"#))
            .is_none());

        let resolution = agg.handle_event(&data_event(DONE_SENTINEL)).unwrap();
        match resolution {
            Resolution::Complete(partial) => assert_eq!(partial.text, "ab"),
            other => panic!("expected Complete, got {:?}", other),
        }
        assert_eq!(agg.state(), AggregatorState::Resolved);
    }

    #[test]
    fn test_conversation_and_message_ids_captured() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(
            r#"{"conversation_id":"conv-9","message":{"id":"msg-3","content":{"parts":["hi"]}}}"#,
        ));

        assert_eq!(agg.partial().conversation_id.as_deref(), Some("conv-9"));
        assert_eq!(agg.partial().message_id.as_deref(), Some("msg-3"));
        assert_eq!(agg.partial().text, "hi");
    }

    #[test]
    fn test_ids_survive_events_that_omit_them() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"conversation_id":"conv-1","message":{"id":"m-1"}}"#));
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["text"]}}}"#));

        assert_eq!(agg.partial().conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(agg.partial().message_id.as_deref(), Some("m-1"));
    }

    #[test]
    fn test_empty_part_does_not_clobber_text() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["answer"]}}}"#));
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":[""]}}}"#));
        assert_eq!(agg.partial().text, "answer");
    }

    #[test]
    fn test_payload_without_message_tolerated() {
        let mut agg = ResponseAggregator::new();
        assert!(agg.handle_event(&data_event(r#"{"conversation_id":"c-1"}"#)).is_none());
        assert!(agg.handle_event(&data_event("{}")).is_none());
        assert_eq!(agg.state(), AggregatorState::Waiting);
    }

    #[test]
    fn test_malformed_payload_rejects_with_partial() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["so far"]}}}"#));

        let resolution = agg.handle_event(&data_event("not json")).unwrap();
        match resolution {
            Resolution::Failed(err) => {
                assert_eq!(err.error_code(), "E_STREAM_PARSE");
                assert_eq!(err.partial().map(|p| p.text.as_str()), Some("so far"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(agg.state(), AggregatorState::Rejected);
    }

    #[test]
    fn test_events_after_terminal_are_ignored() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["final"]}}}"#));
        agg.handle_event(&data_event(DONE_SENTINEL)).unwrap();

        // A buffered tail may still drain through the decoder.
        assert!(agg
            .handle_event(&data_event(r#"{"message":{"content":{"parts":["late"]}}}"#))
            .is_none());
        assert!(agg.handle_event(&data_event("not json")).is_none());
        assert_eq!(agg.partial().text, "final");
        assert_eq!(agg.state(), AggregatorState::Resolved);
    }

    #[test]
    fn test_benign_truncation_resolves_with_partial() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["complete answer"]}}}"#));

        let error = NetworkError::Other {
            message: "error reading a body from connection: connection reset by peer".to_string(),
        };
        match agg.finish_transport_error(error) {
            Resolution::Complete(partial) => assert_eq!(partial.text, "complete answer"),
            other => panic!("expected Complete, got {:?}", other),
        }
        assert_eq!(agg.state(), AggregatorState::Resolved);
    }

    #[test]
    fn test_truncation_signature_without_partial_rejects() {
        let mut agg = ResponseAggregator::new();
        let error = NetworkError::Other {
            message: "connection reset by peer".to_string(),
        };
        match agg.finish_transport_error(error) {
            Resolution::Failed(err) => {
                assert_eq!(err.error_code(), "E_STREAM_CONN");
                assert!(err.partial().is_none());
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(agg.state(), AggregatorState::Rejected);
    }

    #[test]
    fn test_non_benign_transport_error_rejects() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["partial"]}}}"#));

        let error = NetworkError::Other {
            message: "tls handshake alert".to_string(),
        };
        match agg.finish_transport_error(error) {
            Resolution::Failed(err) => {
                assert_eq!(err.partial().map(|p| p.text.as_str()), Some("partial"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_eof_resolves_with_accumulated_partial() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["done early"]}}}"#));

        match agg.finish_eof() {
            Resolution::Complete(partial) => assert_eq!(partial.text, "done early"),
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_classification() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["slow"]}}}"#));

        match agg.finish_timed_out(Duration::from_millis(50)) {
            Resolution::Failed(err) => {
                assert_eq!(err.error_code(), "E_STREAM_TIMEOUT");
                assert_eq!(err.partial().map(|p| p.text.as_str()), Some("slow"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(agg.state(), AggregatorState::TimedOut);
    }

    #[test]
    fn test_progress_callback_sees_each_snapshot_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut agg = ResponseAggregator::with_progress(Box::new(move |partial| {
            sink.lock().unwrap().push(partial.text.clone());
        }));

        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["a"]}}}"#));
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["ab"]}}}"#));
        // Metadata-only events fire no progress.
        agg.handle_event(&data_event(r#"{"conversation_id":"c-1"}"#));
        agg.handle_event(&data_event(DONE_SENTINEL));

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_reconnect_interval_recorded() {
        let mut agg = ResponseAggregator::new();
        assert!(agg
            .handle_event(&StreamEvent::ReconnectInterval { millis: 1500 })
            .is_none());
        assert_eq!(agg.reconnect_interval(), Some(1500));
    }

    #[test]
    fn test_done_resolution_into_result() {
        let mut agg = ResponseAggregator::new();
        agg.handle_event(&data_event(r#"{"message":{"content":{"parts":["ok"]}}}"#));
        let result = agg
            .handle_event(&data_event(DONE_SENTINEL))
            .unwrap()
            .into_result();
        assert_eq!(result.unwrap().text, "ok");
    }
}
