use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sentiment_service::config::{Cli, Command, SentimentModelArgs};
use sentiment_service::evaluation::{
    annotate, check_names, evaluate, load_example_story, load_labeled_corpus, AnnotatedText,
    TEST_SENTENCES,
};
use sentiment_service::ner::{NerBert, NerPipeline, NerPipelineBuilder};
use sentiment_service::sentiment::{
    SentimentAnalysisPipeline, SentimentAnalysisPipelineBuilder, SentimentModernBert,
};
use sentiment_service::service::{SentimentServer, ZmqReplyChannel};

fn sentiment_pipeline(
    args: &SentimentModelArgs,
    cuda: Option<usize>,
) -> anyhow::Result<SentimentAnalysisPipeline<SentimentModernBert>> {
    SentimentAnalysisPipelineBuilder::from_hub(args.repo_id.as_str())
        .device(cuda)
        .build()
        .with_context(|| format!("failed to load sentiment model '{}'", args.repo_id))
}

fn ner_pipeline(repo_id: &str, cuda: Option<usize>) -> anyhow::Result<NerPipeline<NerBert>> {
    NerPipelineBuilder::from_hub(repo_id)
        .device(cuda)
        .build()
        .with_context(|| format!("failed to load NER model '{repo_id}'"))
}

fn print_annotated(annotated: &AnnotatedText) {
    println!("{}", annotated.text);
    println!(
        "sentiment: {} ({:.2}%) -- classification time: {:.3}s",
        annotated.prediction.label,
        annotated.prediction.score * 100.0,
        annotated.elapsed.as_secs_f64()
    );
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, model } => {
            // Load before binding so no request waits on the model.
            let pipeline = sentiment_pipeline(&model, cli.cuda)?;
            let channel = ZmqReplyChannel::bind(&bind).await?;
            let mut server = SentimentServer::new(pipeline, channel);

            let interrupted = tokio::select! {
                result = server.serve() => {
                    result?;
                    false
                }
                _ = tokio::signal::ctrl_c() => true,
            };
            if interrupted {
                tracing::info!(served = server.served(), "shutting down");
            }
        }
        Command::Evaluate { data_dir, model } => {
            let corpus = load_labeled_corpus(&data_dir)?;
            let pipeline = sentiment_pipeline(&model, cli.cuda)?;

            let report = evaluate(&pipeline, &corpus)?;
            for result in &report.results {
                print_annotated(&result.annotated);
            }
            println!("Overall accuracy: {}", report.accuracy());
        }
        Command::Story { data_dir, model } => {
            let fragments = load_example_story(&data_dir)?;
            let pipeline = sentiment_pipeline(&model, cli.cuda)?;
            println!();

            for annotated in annotate(&pipeline, &fragments)? {
                print_annotated(&annotated);
            }
        }
        Command::Names { sentences, model } => {
            let pipeline = ner_pipeline(&model, cli.cuda)?;

            let results = if sentences.is_empty() {
                check_names(&pipeline, &TEST_SENTENCES)?
            } else {
                check_names(&pipeline, &sentences)?
            };
            for (sentence, name) in results {
                println!("----------- {sentence} -----------");
                println!("{name}");
            }
        }
    }

    Ok(())
}
