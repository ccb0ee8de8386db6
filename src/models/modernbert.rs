use candle_core::{Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config,
    ModernBertForSequenceClassification as CandleModernBertForSequenceClassification,
};
use std::collections::HashMap;
use tokenizers::Tokenizer;

use super::ModelId;
use crate::error::{PipelineError, Result};
use crate::loaders::{ordered_labels, parse_id2label, HfLoader};
use crate::pipelines::sentiment::model::SentimentAnalysisModel;
use crate::pipelines::sentiment::pipeline::Prediction;

/// Available ModernBERT sentiment checkpoint sizes.
#[derive(Debug, Clone, Copy)]
pub enum ModernBertSize {
    /// Base model (~150M parameters).
    Base,
    /// Large model (~400M parameters).
    Large,
}

impl ModernBertSize {
    /// The sentiment checkpoint for this size.
    pub fn sentiment_model(self) -> ModelId {
        match self {
            ModernBertSize::Base => ModelId::new("clapAI/modernBERT-base-multilingual-sentiment"),
            ModernBertSize::Large => {
                ModelId::new("clapAI/modernBERT-large-multilingual-sentiment")
            }
        }
    }
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-base",
            ModernBertSize::Large => "modernbert-large",
        };
        write!(f, "{name}")
    }
}

/// ModernBERT with a sequence-classification head.
pub struct SentimentModernBertModel {
    model: CandleModernBertForSequenceClassification,
    device: Device,
    id2label: HashMap<u32, String>,
}

impl SentimentModernBertModel {
    /// Downloads and loads the checkpoint onto `device`.
    pub fn new(model_id: &ModelId, device: Device) -> Result<Self> {
        let loader = HfLoader::new(model_id.as_str())?;

        let config_str = loader.read_config()?;
        let mut config: Config = serde_json::from_str(&config_str)?;
        let id2label = parse_id2label(&config_str)?;
        patch_classifier_config(&mut config, &id2label);

        let vb = loader.load_weights(&device)?;
        let model = CandleModernBertForSequenceClassification::load(vb, &config)?;

        Ok(Self {
            model,
            device,
            id2label,
        })
    }

    fn label_for(&self, pred_id: u32) -> Result<String> {
        self.id2label.get(&pred_id).cloned().ok_or_else(|| {
            PipelineError::Unexpected(format!(
                "Predicted label ID {} not in id2label. Available: {}",
                pred_id,
                ordered_labels(&self.id2label).join(", ")
            ))
        })
    }
}

impl SentimentAnalysisModel for SentimentModernBertModel {
    type Options = ModelId;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        SentimentModernBertModel::new(&options, device)
    }

    fn predict(&self, tokenizer: &Tokenizer, text: &str) -> Result<Prediction> {
        let tokens = tokenizer.encode(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;

        let probs = softmax(&logits, D::Minus1)?;
        let probs_vec = probs.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs_vec.get(pred_id as usize).copied().unwrap_or(0.0);

        Ok(Prediction {
            label: self.label_for(pred_id)?,
            score,
        })
    }

    fn labels(&self) -> Vec<String> {
        ordered_labels(&self.id2label)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        HfLoader::new(options.as_str())?.load_tokenizer()
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

/// candle sizes the classification head from `classifier_config`; make it agree with
/// the checkpoint's label table.
fn patch_classifier_config(config: &mut Config, id2label: &HashMap<u32, String>) {
    let num_labels = id2label.len();
    let matches = config
        .classifier_config
        .as_ref()
        .is_some_and(|c| c.id2label.len() == num_labels);

    if !matches {
        let id2label: HashMap<String, String> = id2label
            .iter()
            .map(|(id, label)| (id.to_string(), label.clone()))
            .collect();
        let label2id: HashMap<String, String> = id2label
            .iter()
            .map(|(k, v)| (v.clone(), k.clone()))
            .collect();

        config.classifier_config = Some(ClassifierConfig {
            id2label,
            label2id,
            classifier_pooling: ClassifierPooling::default(),
        });
    }
}
