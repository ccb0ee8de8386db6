use candle_core::{Device, Module, Tensor, D};
use candle_nn::{linear, ops::softmax, Linear};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;
use std::collections::HashMap;
use tokenizers::Tokenizer;

use super::ModelId;
use crate::error::{PipelineError, Result};
use crate::loaders::{ordered_labels, parse_id2label, HfLoader};
use crate::pipelines::ner::entities::TaggedToken;
use crate::pipelines::ner::model::TokenClassificationModel;

/// Available BERT NER checkpoint sizes (CoNLL-2003 tags: `PER`, `ORG`, `LOC`, `MISC`).
#[derive(Debug, Clone, Copy)]
pub enum BertNerSize {
    /// `dslim/bert-base-NER` (~110M parameters).
    Base,
    /// `dslim/bert-large-NER` (~340M parameters).
    Large,
}

impl BertNerSize {
    /// The NER checkpoint for this size.
    pub fn ner_model(self) -> ModelId {
        match self {
            BertNerSize::Base => ModelId::new("dslim/bert-base-NER"),
            BertNerSize::Large => ModelId::new("dslim/bert-large-NER"),
        }
    }
}

#[derive(Deserialize)]
struct EncoderDims {
    hidden_size: usize,
}

/// BERT encoder with a linear token-classification head (`BertForTokenClassification`).
pub struct NerBertModel {
    bert: BertModel,
    classifier: Linear,
    device: Device,
    id2label: HashMap<u32, String>,
}

impl NerBertModel {
    /// Downloads and loads the checkpoint onto `device`.
    pub fn new(model_id: &ModelId, device: Device) -> Result<Self> {
        let loader = HfLoader::new(model_id.as_str())?;

        let config_str = loader.read_config()?;
        let config: Config = serde_json::from_str(&config_str)?;
        let dims: EncoderDims = serde_json::from_str(&config_str)?;
        let id2label = parse_id2label(&config_str)?;

        let vb = loader.load_weights(&device)?;
        let bert = BertModel::load(vb.pp("bert"), &config)?;
        let classifier = linear(dims.hidden_size, id2label.len(), vb.pp("classifier"))?;

        Ok(Self {
            bert,
            classifier,
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

impl TokenClassificationModel for NerBertModel {
    type Options = ModelId;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        NerBertModel::new(&options, device)
    }

    fn tag(&self, tokenizer: &Tokenizer, text: &str) -> Result<Vec<TaggedToken>> {
        let encoding = tokenizer.encode(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let logits = self.classifier.forward(&hidden)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec2::<f32>()?;

        let special = encoding.get_special_tokens_mask();
        let word_ids = encoding.get_word_ids();
        let offsets = encoding.get_offsets();

        let mut tokens = Vec::with_capacity(probs.len());
        for (i, row) in probs.iter().enumerate() {
            if special[i] == 1 {
                continue;
            }
            let Some(word_id) = word_ids[i] else {
                continue;
            };
            let (pred_id, score) = row
                .iter()
                .copied()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .ok_or_else(|| PipelineError::Unexpected("Empty logits row".to_string()))?;

            tokens.push(TaggedToken {
                word_id,
                start: offsets[i].0,
                end: offsets[i].1,
                label: self.label_for(pred_id as u32)?,
                score,
            });
        }

        Ok(tokens)
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
