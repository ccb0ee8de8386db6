use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::api::sync::{Api, ApiRepo};
use serde::Deserialize;
use serde_json::json;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};

/// Fetches files of one model repository from the HuggingFace Hub.
///
/// Files are cached locally by `hf-hub` after the first download.
pub struct HfLoader {
    repo_id: String,
    repo: ApiRepo,
}

impl HfLoader {
    pub fn new(repo_id: &str) -> Result<Self> {
        let api = Api::new().map_err(|e| {
            PipelineError::Download(format!("Failed to initialize HuggingFace API: {e}"))
        })?;
        let repo = api.model(repo_id.to_string());

        Ok(Self {
            repo_id: repo_id.to_string(),
            repo,
        })
    }

    pub fn get(&self, filename: &str) -> Result<PathBuf> {
        self.repo.get(filename).map_err(|e| {
            PipelineError::Download(format!(
                "Failed to download '{}' from '{}': {}",
                filename, self.repo_id, e
            ))
        })
    }

    pub fn read_config(&self) -> Result<String> {
        let config_path = self.get("config.json")?;
        Ok(std::fs::read_to_string(config_path)?)
    }

    /// Memory-maps `model.safetensors`, falling back to `pytorch_model.bin`.
    pub fn load_weights(&self, device: &Device) -> Result<VarBuilder<'static>> {
        let weights_path = self
            .get("model.safetensors")
            .or_else(|_| self.get("pytorch_model.bin"))?;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, device)?
        };

        Ok(vb)
    }

    /// Loads `tokenizer.json`, or assembles a WordPiece tokenizer from `vocab.txt`
    /// for older BERT checkpoints that never shipped one.
    pub fn load_tokenizer(&self) -> Result<Tokenizer> {
        if let Ok(tokenizer_path) = self.get("tokenizer.json") {
            let path_str = tokenizer_path.display().to_string();
            return Tokenizer::from_file(&tokenizer_path).map_err(|e| {
                PipelineError::Tokenization(format!(
                    "Failed to load tokenizer from '{}': {}",
                    path_str, e
                ))
            });
        }

        tracing::debug!(repo = %self.repo_id, "no tokenizer.json, building WordPiece from vocab.txt");
        let vocab_path = self.get("vocab.txt")?;
        let lowercase = self
            .get("tokenizer_config.json")
            .ok()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| serde_json::from_str::<TokenizerConfigJson>(&s).ok())
            .and_then(|c| c.do_lower_case)
            .unwrap_or(false);

        wordpiece_tokenizer(&vocab_path, lowercase)
    }
}

#[derive(Deserialize)]
struct TokenizerConfigJson {
    do_lower_case: Option<bool>,
}

fn wordpiece_tokenizer(vocab_path: &Path, lowercase: bool) -> Result<Tokenizer> {
    let vocab_str = std::fs::read_to_string(vocab_path)?;
    let vocab: serde_json::Map<String, serde_json::Value> = vocab_str
        .lines()
        .enumerate()
        .map(|(id, token)| (token.to_string(), json!(id)))
        .collect();

    let special_id = |token: &str| {
        vocab.get(token).and_then(|v| v.as_u64()).ok_or_else(|| {
            PipelineError::Tokenization(format!(
                "'{}' missing from {}",
                token,
                vocab_path.display()
            ))
        })
    };
    let cls_id = special_id("[CLS]")?;
    let sep_id = special_id("[SEP]")?;

    let definition = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": lowercase
        },
        "pre_tokenizer": { "type": "BertPreTokenizer" },
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", sep_id],
            "cls": ["[CLS]", cls_id]
        },
        "decoder": { "type": "WordPiece", "prefix": "##", "cleanup": true },
        "model": {
            "type": "WordPiece",
            "unk_token": "[UNK]",
            "continuing_subword_prefix": "##",
            "max_input_chars_per_word": 100,
            "vocab": vocab
        }
    });

    Tokenizer::from_bytes(serde_json::to_vec(&definition)?).map_err(|e| {
        PipelineError::Tokenization(format!(
            "Failed to build tokenizer from '{}': {}",
            vocab_path.display(),
            e
        ))
    })
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Reads the `id2label` table of a classification checkpoint's `config.json`.
pub fn parse_id2label(config_str: &str) -> Result<HashMap<u32, String>> {
    let config: ClassifierConfigJson = serde_json::from_str(config_str)?;
    if config.id2label.is_empty() {
        return Err(PipelineError::Unexpected(
            "config.json has no id2label table".to_string(),
        ));
    }

    config
        .id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<u32>()
                .map(|id| (id, label))
                .map_err(|_| PipelineError::Unexpected(format!("Invalid label id '{id}'")))
        })
        .collect()
}

/// Labels ordered by class id.
pub fn ordered_labels(id2label: &HashMap<u32, String>) -> Vec<String> {
    let mut entries: Vec<_> = id2label.iter().collect();
    entries.sort_by_key(|(id, _)| **id);
    entries.into_iter().map(|(_, label)| label.clone()).collect()
}
