//! Sentiment analysis and person-name extraction for short text fragments.
//!
//! Pretrained checkpoints are fetched from the HuggingFace Hub and run locally with
//! [Candle](https://github.com/huggingface/candle). Sentiment analysis is served over a
//! ZeroMQ request/reply socket; name extraction and corpus evaluation are exposed
//! through the `sentiment-service` binary.

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod config;
pub mod error;
pub mod evaluation;
pub mod service;

pub use pipelines::{ner, sentiment};
