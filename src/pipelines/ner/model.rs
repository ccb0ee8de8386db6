use super::entities::TaggedToken;
use crate::error::Result;
use tokenizers::Tokenizer;

pub trait TokenClassificationModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Tags every non-special token of `text`.
    fn tag(&self, tokenizer: &Tokenizer, text: &str) -> Result<Vec<TaggedToken>>;

    /// The raw tag set of the checkpoint, ordered by class id.
    fn labels(&self) -> Vec<String>;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    fn device(&self) -> &candle_core::Device;
}
