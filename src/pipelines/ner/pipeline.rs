use std::sync::Arc;

use super::entities::{group_entities, Entity};
use super::model::TokenClassificationModel;
use crate::error::{PipelineError, Result};
use crate::pipelines::stats::PipelineStats;
use tokenizers::Tokenizer;

/// Output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Entity spans in input order.
    pub entities: Vec<Entity>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

/// Pulls a person name out of a sentence.
///
/// Implemented by [`NerPipeline`]; the name check harness is written against this trait.
pub trait NameExtractor {
    /// The first person name in `text`, or [`PipelineError::NameNotFound`].
    fn extract_name(&self, text: &str) -> Result<String>;
}

/// Picks the first person span.
///
/// Additional persons are dropped with a warning; none at all is an error.
pub fn first_person(text: &str, entities: &[Entity]) -> Result<String> {
    let names: Vec<&str> = entities
        .iter()
        .filter(|e| e.is_person())
        .map(|e| e.text.as_str())
        .collect();

    match names.as_slice() {
        [] => {
            tracing::error!("Didn't find a name in the text");
            Err(PipelineError::NameNotFound(text.to_string()))
        }
        [name] => Ok(name.to_string()),
        [first, ..] => {
            tracing::warn!(?names, "found more than one name, returning only the first");
            Ok(first.to_string())
        }
    }
}

/// Named-entity recognition over single sentences.
///
/// Construct with [`NerPipelineBuilder`](super::NerPipelineBuilder).
///
/// # Examples
///
/// ```rust,no_run
/// # use sentiment_service::ner::{NerPipelineBuilder, BertNerSize};
/// # fn main() -> sentiment_service::error::Result<()> {
/// let pipeline = NerPipelineBuilder::bert(BertNerSize::Base).build()?;
///
/// let name = pipeline.extract_name("My name is Leon Berov.")?;
/// assert_eq!(name, "Leon Berov");
/// # Ok(())
/// # }
/// ```
pub struct NerPipeline<M: TokenClassificationModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
}

impl<M: TokenClassificationModel> NerPipeline<M> {
    /// Tag `text` and group the tags into entity spans.
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        let tokens = self.model.tag(&self.tokenizer, text)?;
        let entities = group_entities(text, &tokens);
        let stats = stats_builder.finish(1);

        tracing::debug!(
            ?entities,
            "finished inference in {:.3}s",
            stats.seconds()
        );

        Ok(Output { entities, stats })
    }

    /// The first span tagged as a person.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NameNotFound`] when the sentence contains no person.
    pub fn extract_name(&self, text: &str) -> Result<String> {
        tracing::info!(sentence = text, "start extracting a name");
        let output = self.run(text)?;
        let name = first_person(text, &output.entities)?;
        tracing::info!("returning name: {name}");
        Ok(name)
    }

    /// The raw tag set of the model.
    pub fn labels(&self) -> Vec<String> {
        self.model.labels()
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M: TokenClassificationModel> Clone for NerPipeline<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            tokenizer: self.tokenizer.clone(),
        }
    }
}

impl<M: TokenClassificationModel> NameExtractor for NerPipeline<M> {
    fn extract_name(&self, text: &str) -> Result<String> {
        NerPipeline::extract_name(self, text)
    }
}
