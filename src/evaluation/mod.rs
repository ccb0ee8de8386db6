//! Offline checks of the models against small bundled corpora.
//!
//! Not part of the serving path: these read fixed files and report what the models say.

pub mod corpus;
pub mod harness;

pub use corpus::{load_example_story, load_labeled_corpus, ExpectedLabel, LabeledText};
pub use harness::{
    annotate, check_names, evaluate, AnnotatedText, EvaluatedText, EvaluationReport,
    NO_NAME_FOUND, TEST_SENTENCES,
};
