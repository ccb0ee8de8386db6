//! The sentiment request/reply service.
//!
//! [`SentimentServer`] answers one request at a time: it waits for a request, classifies
//! both continuations with the injected [`SentimentAnalyzer`](crate::sentiment::SentimentAnalyzer)
//! and replies before receiving again.
//!
//! ```rust,no_run
//! use sentiment_service::sentiment::{SentimentAnalysisPipelineBuilder, ModernBertSize};
//! use sentiment_service::service::{SentimentServer, ZmqReplyChannel};
//!
//! # async fn run() -> sentiment_service::error::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
//! let channel = ZmqReplyChannel::bind("tcp://0.0.0.0:8107").await?;
//!
//! SentimentServer::new(pipeline, channel).serve().await
//! # }
//! ```

pub mod protocol;
mod server;
mod transport;

pub use protocol::{ErrorResponse, SentimentRequest, SentimentResponse, REPLY_TOPIC};
pub use server::{ReplyChannel, SentimentServer};
pub use transport::ZmqReplyChannel;

/// Where the service listens unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "tcp://0.0.0.0:8107";
