//! Concrete implementations of the transport abstraction.
//!
//! Production adapters normalize the two response-body shapes into the
//! [`ChunkSource`] trait, and [`Utf8Assembler`] turns their raw chunks
//! into boundary-safe text for the decoder.
//!
//! # Adapters
//!
//! - [`ReqwestChunkSource`] - pull-based source over a reqwest body
//! - [`ChannelChunkSource`] - push-based source fed through a channel
//! - [`mock::ScriptedChunkSource`] - scripted test double
//!
//! [`ChunkSource`]: crate::traits::ChunkSource

pub mod channel_stream;
pub mod mock;
pub mod reqwest_stream;
pub mod utf8;

pub use channel_stream::{chunk_channel, ChannelChunkSource, ChunkSender};
pub use reqwest_stream::ReqwestChunkSource;
pub use utf8::Utf8Assembler;
