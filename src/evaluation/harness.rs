//! Accuracy, story and name checks over a [`SentimentAnalyzer`] or [`NameExtractor`].

use std::time::Duration;

use super::corpus::{ExpectedLabel, LabeledText};
use crate::error::{PipelineError, Result};
use crate::ner::NameExtractor;
use crate::pipelines::stats::PipelineStats;
use crate::sentiment::{Prediction, SentimentAnalyzer};

/// Printed by the name check when a sentence has no person in it.
pub const NO_NAME_FOUND: &str = "no name found";

/// Sentences the name check runs when none are given.
pub const TEST_SENTENCES: [&str; 6] = [
    "My name is Leon Berov.",
    "I'm Leonid.",
    "Leon.",
    "I'm... ehm... let's say it's Bobby.",
    "I'm General House from Washington, howdy.",
    "Sorry, I didn't get that?",
];

/// A classified text with its inference time.
#[derive(Debug, Clone)]
pub struct AnnotatedText {
    /// The input.
    pub text: String,
    /// What the model said.
    pub prediction: Prediction,
    /// Wall-clock time of the inference call.
    pub elapsed: Duration,
}

/// A classified corpus line and whether it matched its expected label.
#[derive(Debug, Clone)]
pub struct EvaluatedText {
    /// Input and prediction.
    pub annotated: AnnotatedText,
    /// Expected label.
    pub expected: ExpectedLabel,
    /// `true` when the prediction matches `expected`, ignoring case.
    pub correct: bool,
}

/// Per-line results of an accuracy run.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    /// Results in corpus order.
    pub results: Vec<EvaluatedText>,
}

impl EvaluationReport {
    /// Lines evaluated.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Lines whose prediction matched.
    pub fn correct(&self) -> usize {
        self.results.iter().filter(|r| r.correct).count()
    }

    /// Fraction of matching lines; `0.0` for an empty corpus.
    pub fn accuracy(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.correct() as f64 / self.total() as f64
    }
}

fn annotate_one<A: SentimentAnalyzer>(analyzer: &A, text: &str) -> Result<AnnotatedText> {
    let stats = PipelineStats::start();
    let prediction = analyzer.analyze(text)?;
    let elapsed = stats.finish(1).total_time;

    Ok(AnnotatedText {
        text: text.to_string(),
        prediction,
        elapsed,
    })
}

/// Classifies every fragment in order.
pub fn annotate<A: SentimentAnalyzer>(
    analyzer: &A,
    fragments: &[String],
) -> Result<Vec<AnnotatedText>> {
    fragments
        .iter()
        .map(|fragment| annotate_one(analyzer, fragment))
        .collect()
}

/// Classifies every corpus line and compares against its expected label.
pub fn evaluate<A: SentimentAnalyzer>(
    analyzer: &A,
    corpus: &[LabeledText],
) -> Result<EvaluationReport> {
    let results = corpus
        .iter()
        .map(|line| {
            let annotated = annotate_one(analyzer, &line.text)?;
            let correct = line.label.matches(&annotated.prediction.label);
            Ok(EvaluatedText {
                annotated,
                expected: line.label,
                correct,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let report = EvaluationReport { results };
    tracing::info!(
        correct = report.correct(),
        total = report.total(),
        "overall accuracy: {}",
        report.accuracy()
    );
    Ok(report)
}

/// Extracts a name from each sentence, substituting [`NO_NAME_FOUND`] when there is none.
///
/// Errors other than [`PipelineError::NameNotFound`] are returned.
pub fn check_names<E: NameExtractor, S: AsRef<str>>(
    extractor: &E,
    sentences: &[S],
) -> Result<Vec<(String, String)>> {
    sentences
        .iter()
        .map(|sentence| {
            let sentence = sentence.as_ref();
            let name = match extractor.extract_name(sentence) {
                Ok(name) => name,
                Err(PipelineError::NameNotFound(_)) => NO_NAME_FOUND.to_string(),
                Err(e) => return Err(e),
            };
            Ok((sentence.to_string(), name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Labels by keyword, with the capitalisation the checkpoints use.
    struct KeywordAnalyzer;

    impl SentimentAnalyzer for KeywordAnalyzer {
        fn analyze(&self, text: &str) -> Result<Prediction> {
            let label = if text.contains("love") {
                "positive"
            } else if text.contains("hate") {
                "negative"
            } else {
                "neutral"
            };
            Ok(Prediction {
                label: label.into(),
                score: 0.8,
            })
        }
    }

    fn labeled(text: &str, label: ExpectedLabel) -> LabeledText {
        LabeledText {
            text: text.into(),
            label,
        }
    }

    #[test]
    fn accuracy_is_fraction_of_case_insensitive_matches() {
        let corpus = [
            labeled("I love it", ExpectedLabel::Positive),
            labeled("It is fine", ExpectedLabel::Positive),
            labeled("I hate it", ExpectedLabel::Negative),
            labeled("I love to hate it", ExpectedLabel::Negative),
        ];

        let report = evaluate(&KeywordAnalyzer, &corpus).unwrap();

        assert_eq!(report.total(), 4);
        assert_eq!(report.correct(), 2);
        assert!((report.accuracy() - 0.5).abs() < f64::EPSILON);
        assert!(report.results[0].correct);
        assert!(!report.results[1].correct);
        assert_eq!(report.results[3].annotated.prediction.label, "positive");
    }

    #[test]
    fn repeated_runs_give_identical_accuracy() {
        let corpus = [
            labeled("I love it", ExpectedLabel::Positive),
            labeled("meh", ExpectedLabel::Negative),
            labeled("I hate it", ExpectedLabel::Negative),
        ];

        let first = evaluate(&KeywordAnalyzer, &corpus).unwrap().accuracy();
        let second = evaluate(&KeywordAnalyzer, &corpus).unwrap().accuracy();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_corpus_has_zero_accuracy() {
        let report = evaluate(&KeywordAnalyzer, &[]).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.accuracy(), 0.0);
    }

    #[test]
    fn annotate_keeps_fragment_order() {
        let fragments = vec!["I hate rain.".to_string(), "I love sun.".to_string()];
        let annotated = annotate(&KeywordAnalyzer, &fragments).unwrap();

        let labels: Vec<_> = annotated
            .iter()
            .map(|a| a.prediction.label.as_str())
            .collect();
        assert_eq!(labels, ["negative", "positive"]);
        assert_eq!(annotated[1].text, "I love sun.");
    }

    struct FirstCapitalized;

    impl NameExtractor for FirstCapitalized {
        fn extract_name(&self, text: &str) -> Result<String> {
            if text.contains("crash") {
                return Err(PipelineError::Unexpected("model crashed".into()));
            }
            text.split_whitespace()
                .skip(1)
                .find(|w| w.starts_with(char::is_uppercase))
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
                .ok_or_else(|| PipelineError::NameNotFound(text.to_string()))
        }
    }

    #[test]
    fn missing_names_become_sentinel() {
        let results =
            check_names(&FirstCapitalized, &["My name is Leon.", "no one here"]).unwrap();

        assert_eq!(results[0], ("My name is Leon.".to_string(), "Leon".to_string()));
        assert_eq!(results[1].1, NO_NAME_FOUND);
    }

    #[test]
    fn other_extraction_errors_propagate() {
        let err = check_names(&FirstCapitalized, &["crash now"]).unwrap_err();
        assert!(matches!(err, PipelineError::Unexpected(_)));
    }
}
