//! Line-oriented corpus files read by the evaluation commands.

use std::path::Path;

use crate::error::{PipelineError, Result};

/// Statements expected to be classified positive, one per line.
pub const POSITIVE_STATEMENTS: &str = "positive_statements.txt";
/// Statements expected to be classified negative, one per line.
pub const NEGATIVE_STATEMENTS: &str = "negative_statements.txt";
/// An unlabeled narrative split into fragments, one per line.
pub const EXAMPLE_STORY: &str = "example_story.txt";

/// The label a corpus line is expected to receive, derived from its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedLabel {
    /// From [`POSITIVE_STATEMENTS`].
    Positive,
    /// From [`NEGATIVE_STATEMENTS`].
    Negative,
}

impl ExpectedLabel {
    /// Upper-case label name.
    pub fn as_str(self) -> &'static str {
        match self {
            ExpectedLabel::Positive => "POSITIVE",
            ExpectedLabel::Negative => "NEGATIVE",
        }
    }

    /// Case-insensitive comparison with a model label.
    pub fn matches(self, predicted: &str) -> bool {
        predicted.eq_ignore_ascii_case(self.as_str())
    }
}

impl std::fmt::Display for ExpectedLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One corpus line with its expected label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledText {
    /// The statement.
    pub text: String,
    /// Label derived from the file it came from.
    pub label: ExpectedLabel,
}

/// Reads trimmed, non-blank lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Corpus(format!("Failed to read '{}': {}", path.display(), e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Positive statements followed by negative statements from `data_dir`.
pub fn load_labeled_corpus(data_dir: &Path) -> Result<Vec<LabeledText>> {
    let load = |file: &str, label: ExpectedLabel| -> Result<Vec<LabeledText>> {
        Ok(read_lines(&data_dir.join(file))?
            .into_iter()
            .map(|text| LabeledText { text, label })
            .collect())
    };

    let mut corpus = load(POSITIVE_STATEMENTS, ExpectedLabel::Positive)?;
    corpus.extend(load(NEGATIVE_STATEMENTS, ExpectedLabel::Negative)?);
    Ok(corpus)
}

/// Fragments of the example story from `data_dir`.
pub fn load_example_story(data_dir: &Path) -> Result<Vec<String>> {
    read_lines(&data_dir.join(EXAMPLE_STORY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn labels_follow_their_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(POSITIVE_STATEMENTS), "Great day!\nI love it.\n").unwrap();
        fs::write(dir.path().join(NEGATIVE_STATEMENTS), "Awful.\n").unwrap();

        let corpus = load_labeled_corpus(dir.path()).unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus[0].text, "Great day!");
        assert_eq!(corpus[1].label, ExpectedLabel::Positive);
        assert_eq!(corpus[2].text, "Awful.");
        assert_eq!(corpus[2].label, ExpectedLabel::Negative);
    }

    #[test]
    fn lines_are_trimmed_and_blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXAMPLE_STORY);
        fs::write(&path, "  Once upon a time.  \r\n\n   \nThe end.").unwrap();

        assert_eq!(
            load_example_story(dir.path()).unwrap(),
            ["Once upon a time.", "The end."]
        );
    }

    #[test]
    fn missing_file_is_corpus_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_labeled_corpus(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Corpus(_)));
        assert!(err.to_string().contains(POSITIVE_STATEMENTS));
    }

    #[test]
    fn label_match_ignores_case() {
        assert!(ExpectedLabel::Positive.matches("positive"));
        assert!(ExpectedLabel::Negative.matches("NEGATIVE"));
        assert!(!ExpectedLabel::Negative.matches("neutral"));
    }
}
