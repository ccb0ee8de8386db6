// ============ Model implementations ============

pub(crate) mod bert;
pub(crate) mod modernbert;

pub use bert::BertNerSize;
pub use modernbert::ModernBertSize;

/// Identifies a checkpoint on the HuggingFace Hub, e.g. `dslim/bert-base-NER`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    /// Wraps a Hub repository id.
    pub fn new(repo_id: impl Into<String>) -> Self {
        Self(repo_id.into())
    }

    /// The repository id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl crate::pipelines::cache::ModelOptions for ModelId {
    fn cache_key(&self) -> String {
        self.0.clone()
    }
}
