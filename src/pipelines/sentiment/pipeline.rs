use std::sync::Arc;

use super::model::SentimentAnalysisModel;
use crate::error::Result;
use crate::pipelines::stats::PipelineStats;
use tokenizers::Tokenizer;

// ============ Output types ============

/// A sentiment prediction with label and confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The predicted sentiment (e.g., "positive", "negative", "neutral").
    pub label: String,
    /// Confidence score (0.0 to 1.0).
    pub score: f32,
}

/// Output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Sentiment prediction.
    pub prediction: Prediction,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Analyzer seam ============

/// Maps text to a sentiment prediction.
///
/// Implemented by [`SentimentAnalysisPipeline`]; the server loop and the evaluation
/// harness are written against this trait so they can be exercised without a model.
pub trait SentimentAnalyzer {
    /// Classify `text`.
    fn analyze(&self, text: &str) -> Result<Prediction>;
}

impl<T: SentimentAnalyzer + ?Sized> SentimentAnalyzer for &T {
    fn analyze(&self, text: &str) -> Result<Prediction> {
        (**self).analyze(text)
    }
}

// ============ Pipeline ============

/// Classifies text sentiment (positive, negative, neutral).
///
/// Construct with [`SentimentAnalysisPipelineBuilder`](super::SentimentAnalysisPipelineBuilder).
/// Cloning is cheap: clones share the loaded model.
///
/// # Examples
///
/// ```rust,no_run
/// # use sentiment_service::sentiment::{SentimentAnalysisPipelineBuilder, ModernBertSize};
/// # fn main() -> sentiment_service::error::Result<()> {
/// let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
///
/// let output = pipeline.run("I love this product!")?;
/// println!("{}: {:.2}", output.prediction.label, output.prediction.score);
/// # Ok(())
/// # }
/// ```
pub struct SentimentAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipeline<M> {
    /// Analyze text sentiment with a single forward pass.
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        let prediction = self.model.predict(&self.tokenizer, text)?;
        let stats = stats_builder.finish(1);

        tracing::debug!(
            "sentiment: {} ({:.2}%) -- classification time: {:.3}s",
            prediction.label,
            prediction.score * 100.0,
            stats.seconds()
        );

        Ok(Output { prediction, stats })
    }

    /// The labels this pipeline can return.
    pub fn labels(&self) -> Vec<String> {
        self.model.labels()
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M: SentimentAnalysisModel> Clone for SentimentAnalysisPipeline<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            tokenizer: self.tokenizer.clone(),
        }
    }
}

impl<M: SentimentAnalysisModel> SentimentAnalyzer for SentimentAnalysisPipeline<M> {
    fn analyze(&self, text: &str) -> Result<Prediction> {
        Ok(self.run(text)?.prediction)
    }
}
