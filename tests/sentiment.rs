#![cfg(feature = "integration")]

use sentiment_service::error::Result;
use sentiment_service::sentiment::{
    ModernBertSize, SentimentAnalysisPipelineBuilder, SentimentAnalyzer,
};

#[test]
fn sentiment_basic() -> Result<()> {
    let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;

    let output = pipeline.run("I love Rust!")?;
    assert!(pipeline.labels().contains(&output.prediction.label));
    assert!(output.prediction.score >= 0.0 && output.prediction.score <= 1.0);
    Ok(())
}

#[test]
fn sentiment_polarity() -> Result<()> {
    let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;

    let love = pipeline.analyze("I love this!")?;
    let hate = pipeline.analyze("I hate this.")?;

    assert!(love.label.eq_ignore_ascii_case("positive"), "{love:?}");
    assert!(hate.label.eq_ignore_ascii_case("negative"), "{hate:?}");
    Ok(())
}

#[test]
fn sentiment_is_deterministic() -> Result<()> {
    let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
        .cpu()
        .build()?;

    let first = pipeline.analyze("The weather is nice today.")?;
    let second = pipeline.analyze("The weather is nice today.")?;
    assert_eq!(first.label, second.label);
    Ok(())
}
