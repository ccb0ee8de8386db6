//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`PipelineError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PipelineError`] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The unified error type for all crate errors.
///
/// # Example
///
/// ```rust,no_run
/// use sentiment_service::error::PipelineError;
///
/// fn describe(e: &PipelineError) -> &'static str {
///     match e {
///         PipelineError::Download(_) => "model could not be fetched",
///         PipelineError::NameNotFound(_) => "no person in the sentence",
///         PipelineError::InvalidRequest(_) => "client sent a bad payload",
///         PipelineError::Transport(_) => "socket failure",
///         _ => "other failure",
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Network or download failure while fetching a model.
    #[error("{0}")]
    Download(String),

    /// Tokenizer could not be loaded or failed on the input text.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// The text contains no entity tagged as a person.
    #[error("No name found in '{0}'")]
    NameNotFound(String),

    /// A request could not be decoded. The server answers these with an error reply.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Socket bind, receive or send failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An evaluation corpus file could not be read.
    #[error("{0}")]
    Corpus(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<candle_core::Error> for PipelineError {
    fn from(value: candle_core::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<zeromq::ZmqError> for PipelineError {
    fn from(value: zeromq::ZmqError) -> Self {
        PipelineError::Transport(value.to_string())
    }
}
