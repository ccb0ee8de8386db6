use sentiment_service::error::Result;
use sentiment_service::sentiment::{ModernBertSize, SentimentAnalysisPipelineBuilder};

fn main() -> Result<()> {
    println!("Building pipeline...");

    let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;

    println!("Pipeline built. Labels: {:?}", pipeline.labels());

    let texts = [
        "I love my new car",
        "Terrible experience, would not recommend.",
        "It's okay, nothing special.",
    ];

    for text in texts {
        let output = pipeline.run(text)?;
        println!(
            "{text} -> {} ({:.4}) in {:.2}ms",
            output.prediction.label,
            output.prediction.score,
            output.stats.total_time.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
