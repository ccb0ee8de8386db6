use super::pipeline::Prediction;
use crate::error::Result;
use tokenizers::Tokenizer;

pub trait SentimentAnalysisModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// One forward pass; returns the top-scoring label and its probability.
    fn predict(&self, tokenizer: &Tokenizer, text: &str) -> Result<Prediction>;

    /// The fixed label set of the checkpoint, ordered by class id.
    fn labels(&self) -> Vec<String>;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    fn device(&self) -> &candle_core::Device;
}
