//! Data models for the conversation API.
//!
//! Request-side wire types serialized into the streaming endpoint's JSON
//! body, plus the evolving [`PartialResponse`] the aggregator builds from
//! decoded events and the per-request [`AskOptions`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

/// Model identifier sent when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "text-davinci-002-render";

/// The evolving answer for one streamed request.
///
/// The backend resends the full partial message on every event, so `text`
/// is replaced wholesale per event, never appended to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialResponse {
    /// Latest full text of the answer.
    pub text: String,
    /// Conversation this answer belongs to, once the backend assigns one.
    pub conversation_id: Option<String>,
    /// Id of the answer message, once known.
    pub message_id: Option<String>,
}

impl PartialResponse {
    /// True when no text has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Callback invoked synchronously with the updated snapshot whenever the
/// partial answer's text changes. Must not block the decode loop for
/// unbounded time; throttling is the caller's concern.
pub type ProgressCallback = Box<dyn FnMut(&PartialResponse) + Send>;

/// Per-request options for [`ChatClient::send_message`].
///
/// [`ChatClient::send_message`]: crate::client::ChatClient::send_message
#[derive(Default)]
pub struct AskOptions {
    /// Continue an existing conversation.
    pub conversation_id: Option<String>,
    /// Parent message to attach the new message under. A fresh id is
    /// generated when absent.
    pub parent_message_id: Option<String>,
    /// Model override; [`DEFAULT_MODEL`] when absent.
    pub model: Option<String>,
    /// Overall deadline for the streamed answer.
    pub timeout: Option<Duration>,
    /// Progress callback fired on each text update.
    pub on_progress: Option<ProgressCallback>,
}

impl AskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversation(
        mut self,
        conversation_id: impl Into<String>,
        parent_message_id: impl Into<String>,
    ) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self.parent_message_id = Some(parent_message_id.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }
}

impl fmt::Debug for AskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AskOptions")
            .field("conversation_id", &self.conversation_id)
            .field("parent_message_id", &self.parent_message_id)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Body of a streaming conversation request.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationRequest {
    pub action: String,
    pub messages: Vec<RequestMessage>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub parent_message_id: String,
}

/// One outgoing message in a conversation request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestMessage {
    pub id: String,
    pub role: String,
    pub content: RequestContent,
}

/// Message content; the backend expects text split into parts.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub content_type: String,
    pub parts: Vec<String>,
}

impl ConversationRequest {
    /// Build the request body for a user message with the given options.
    pub fn new(text: &str, options: &AskOptions) -> Self {
        Self {
            action: "next".to_string(),
            messages: vec![RequestMessage {
                id: Uuid::new_v4().to_string(),
                role: "user".to_string(),
                content: RequestContent {
                    content_type: "text".to_string(),
                    parts: vec![text.to_string()],
                },
            }],
            model: options
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            conversation_id: options.conversation_id.clone(),
            parent_message_id: options
                .parent_message_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }
}
