//! Command line and environment configuration for the `sentiment-service` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::service::DEFAULT_ENDPOINT;

/// Default sentiment checkpoint.
pub const DEFAULT_SENTIMENT_MODEL: &str = "clapAI/modernBERT-base-multilingual-sentiment";
/// Default NER checkpoint.
pub const DEFAULT_NER_MODEL: &str = "dslim/bert-base-NER";

/// Sentiment analysis and name extraction with pretrained models.
#[derive(Debug, Parser)]
#[command(name = "sentiment-service", version, about)]
pub struct Cli {
    /// Run inference on this CUDA device instead of the CPU.
    #[arg(long, global = true, env = "SENTIMENT_CUDA_DEVICE")]
    pub cuda: Option<usize>,

    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve sentiment requests over a ZeroMQ REP socket.
    Serve {
        /// Endpoint to bind.
        #[arg(long, env = "SENTIMENT_BIND", default_value = DEFAULT_ENDPOINT)]
        bind: String,

        /// Sentiment model options.
        #[command(flatten)]
        model: SentimentModelArgs,
    },

    /// Report accuracy on the labeled positive/negative statements.
    Evaluate {
        /// Directory holding the corpus files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Sentiment model options.
        #[command(flatten)]
        model: SentimentModelArgs,
    },

    /// Print the sentiment of every fragment of the example story.
    Story {
        /// Directory holding the corpus files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Sentiment model options.
        #[command(flatten)]
        model: SentimentModelArgs,
    },

    /// Extract person names from sentences (built-in test sentences by default).
    Names {
        /// Sentences to check.
        sentences: Vec<String>,

        /// HuggingFace Hub id of a BERT token-classification checkpoint.
        #[arg(long, env = "NER_MODEL", default_value = DEFAULT_NER_MODEL)]
        model: String,
    },
}

/// Selects the sentiment checkpoint.
#[derive(Debug, Clone, Args)]
pub struct SentimentModelArgs {
    /// HuggingFace Hub id of a ModernBERT sequence-classification checkpoint.
    #[arg(long = "model", env = "SENTIMENT_MODEL", default_value = DEFAULT_SENTIMENT_MODEL)]
    pub repo_id: String,
}
