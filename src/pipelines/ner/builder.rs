use std::sync::Arc;

use super::model::TokenClassificationModel;
use super::pipeline::NerPipeline;
use crate::error::Result;
use crate::models::{BertNerSize, ModelId};
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, StandardPipelineBuilder};

crate::pipelines::utils::impl_device_methods!(delegated: NerPipelineBuilder<M: TokenClassificationModel>);

/// Builder for creating [`NerPipeline`] instances.
///
/// Use [`Self::bert`] or [`Self::from_hub`] as the entry point.
///
/// # Examples
///
/// ```rust,no_run
/// # use sentiment_service::ner::{NerPipelineBuilder, BertNerSize};
/// # fn main() -> sentiment_service::error::Result<()> {
/// let pipeline = NerPipelineBuilder::bert(BertNerSize::Large).cpu().build()?;
/// # Ok(())
/// # }
/// ```
pub struct NerPipelineBuilder<M: TokenClassificationModel>(
    StandardPipelineBuilder<M::Options>,
);

impl<M: TokenClassificationModel> NerPipelineBuilder<M> {
    pub(crate) fn new(options: M::Options) -> Self {
        Self(StandardPipelineBuilder::new(options))
    }

    /// Builds the pipeline with configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if model loading or device initialization fails.
    pub fn build(self) -> Result<NerPipeline<M>>
    where
        M: Send + Sync + 'static,
        M::Options: ModelOptions + std::fmt::Display + Clone,
    {
        BasePipelineBuilder::build(self)
    }
}

impl<M: TokenClassificationModel> BasePipelineBuilder<M> for NerPipelineBuilder<M>
where
    M: Send + Sync + 'static,
    M::Options: ModelOptions + std::fmt::Display + Clone,
{
    type Pipeline = NerPipeline<M>;
    type Options = M::Options;

    fn options(&self) -> &Self::Options {
        &self.0.options
    }

    fn device_request(&self) -> &DeviceRequest {
        &self.0.device_request
    }

    fn create_model(options: Self::Options, device: candle_core::Device) -> Result<M> {
        M::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<tokenizers::Tokenizer> {
        M::get_tokenizer(options)
    }

    fn construct_pipeline(
        model: Arc<M>,
        tokenizer: tokenizers::Tokenizer,
    ) -> Result<Self::Pipeline> {
        Ok(NerPipeline { model, tokenizer })
    }
}

impl NerPipelineBuilder<super::NerBert> {
    /// Creates a builder for a BERT NER model.
    pub fn bert(size: BertNerSize) -> Self {
        Self::new(size.ner_model())
    }

    /// Creates a builder for any BERT token-classification checkpoint on the Hub.
    pub fn from_hub(repo_id: impl Into<String>) -> Self {
        Self::new(ModelId::new(repo_id))
    }
}
