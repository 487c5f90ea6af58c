//! Prelude module for convenient imports.
//!
//! ```ignore
//! use parlance::prelude::*;
//! ```

pub use crate::aggregator::{AggregatorState, Resolution, ResponseAggregator, DONE_SENTINEL};
pub use crate::auth::{AccessToken, StaticTokenRefresher, TokenCache};
pub use crate::client::{stream_to_resolution, ChatClient};
pub use crate::error::{ParlanceError, ParlanceResult};
pub use crate::models::{AskOptions, PartialResponse, ProgressCallback, DEFAULT_MODEL};
pub use crate::sse::{SseDecoder, StreamEvent};
pub use crate::traits::{ChunkSource, TokenRefresher};
