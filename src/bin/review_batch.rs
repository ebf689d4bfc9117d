//! Batch driver: sample reviews, then normalize or fully analyze them into CSV.
//!
//! Shares configuration and the analysis pipeline with the HTTP binary, so rows written here
//! match `POST /analyze` responses for the same reviews.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reviewlens::{
    batch::{self, ReviewSource},
    config::{self, Config},
    dataset::{DEFAULT_HUB_URL, HubQuery},
    export, logging,
    logging::ConsoleTarget,
    pipeline::AnalysisService,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "review-batch",
    about = "Sample product reviews and run the analysis pipeline over them"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a seeded sample of raw reviews (`review` column).
    Sample {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 1000)]
        sample_size: usize,
        #[arg(long, default_value = "reviews.csv")]
        output: PathBuf,
    },
    /// Clean and remove stopwords (`review, normalized_review`).
    Preprocess {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 1000)]
        sample_size: usize,
        #[arg(long, default_value = "reviews_preprocessed.csv")]
        output: PathBuf,
    },
    /// Run the full pipeline (`review, normalized_review, sentiment, topics, summary`).
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 500)]
        sample_size: usize,
        #[arg(long, default_value = "reviews_with_sentiment_topics_summary.csv")]
        output: PathBuf,
        /// Also emit the `cleaned_review` column.
        #[arg(long)]
        with_cleaned: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Local CSV with a `review`, `content` or `text` column; overrides the dataset server.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value = "amazon_polarity")]
    dataset: String,
    #[arg(long, default_value = "train")]
    split: String,
    /// Dataset configuration; defaults to the dataset name.
    #[arg(long)]
    dataset_config: Option<String>,
    /// Leading rows fetched from the dataset server before sampling.
    #[arg(long, default_value_t = 5000)]
    pool_size: usize,
    #[arg(long, default_value = DEFAULT_HUB_URL)]
    hub_url: String,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Rows printed to stdout after writing the output.
    #[arg(long, default_value_t = 10)]
    preview: usize,
}

impl SourceArgs {
    fn review_source(&self) -> ReviewSource {
        if let Some(path) = &self.input {
            return ReviewSource::Csv(path.clone());
        }
        let mut query = HubQuery::new(self.dataset.clone(), self.split.clone());
        if let Some(config) = &self.dataset_config {
            query.config = config.clone();
        }
        ReviewSource::Hub {
            base_url: self.hub_url.clone(),
            query,
            pool_size: self.pool_size,
        }
    }

    async fn sample(&self, config: &Config, sample_size: usize) -> Result<Vec<String>> {
        let source = self.review_source();
        source
            .sample(
                Duration::from_secs(config.http_timeout_secs),
                sample_size,
                self.seed,
            )
            .await
            .with_context(|| format!("failed to sample {sample_size} reviews from {source:?}"))
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("invalid configuration")?;
    // Previews go to stdout.
    logging::init_tracing("review-batch", ConsoleTarget::Stderr);

    match cli.command {
        Command::Sample {
            source,
            sample_size,
            output,
        } => {
            let reviews = source.sample(config, sample_size).await?;
            export::write_sample_csv(create_output(&output)?, &reviews)
                .with_context(|| format!("failed to write {}", output.display()))?;
            let rows: Vec<Vec<String>> = reviews.iter().map(|r| vec![r.clone()]).collect();
            print!("{}", export::format_preview(&["review"], &rows, source.preview));
            tracing::info!(rows = reviews.len(), output = %output.display(), "Sample written");
        }
        Command::Preprocess {
            source,
            sample_size,
            output,
        } => {
            let reviews = source.sample(config, sample_size).await?;
            let rows = batch::preprocess(reviews);
            export::write_normalized_csv(create_output(&output)?, &rows)
                .with_context(|| format!("failed to write {}", output.display()))?;
            print!(
                "{}",
                export::format_preview(
                    &["review", "normalized_review"],
                    &batch::normalized_preview_rows(&rows),
                    source.preview
                )
            );
            tracing::info!(rows = rows.len(), output = %output.display(), "Preprocessed reviews written");
        }
        Command::Analyze {
            source,
            sample_size,
            output,
            with_cleaned,
        } => {
            let service = AnalysisService::from_config(config)
                .context("failed to initialize analysis pipeline")?;
            let reviews = source.sample(config, sample_size).await?;
            let results = batch::analyze(&service, &reviews).await;
            export::write_analysis_csv(create_output(&output)?, &results, with_cleaned)
                .with_context(|| format!("failed to write {}", output.display()))?;
            print!(
                "{}",
                export::format_preview(
                    &["review", "sentiment", "topics"],
                    &batch::analysis_preview_rows(&results),
                    source.preview
                )
            );

            let snapshot = service.metrics().snapshot();
            tracing::info!(
                reviews = snapshot.reviews_analyzed,
                positive = snapshot.positive,
                negative = snapshot.negative,
                neutral = snapshot.neutral,
                summaries_generated = snapshot.summaries_generated,
                summaries_passed_through = snapshot.summaries_passed_through,
                summaries_failed = snapshot.summaries_failed,
                topic_failures = snapshot.topic_failures,
                output = %output.display(),
                "Analysis written"
            );
        }
    }

    Ok(())
}
