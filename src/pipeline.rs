//! Per-review orchestration of the analysis stages.
//!
//! Each review flows through `clean -> remove_stopwords` and the normalized text is then fed
//! independently to the sentiment, topic and summary stages. [`AnalysisService`] owns the
//! model-backed collaborators; construct it once near process start and share it through an
//! `Arc` so the HTTP server and the batch driver run identical logic.

use crate::{
    config::Config,
    embedding::{EmbeddingClientError, get_embedding_client},
    metrics::{MetricsSnapshot, PipelineMetrics},
    sentiment::{LexiconError, LexiconScorer, PolarityScorer, Sentiment, VaderScorer, classify},
    summarization::{
        SummarizationClient, SummarizationClientError, SummaryOutcome, get_summarization_client,
        summarize,
    },
    text::{clean, remove_stopwords},
    topics::{EmbeddingKeyphraseRanker, KeyphraseRanker, extract_topics},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Extra tokens the summarizer may emit beyond the input's word count.
pub const SUMMARY_MAX_NEW_TOKENS: usize = 40;

/// Outcome of analyzing one review. Fields appear in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Original review text, unchanged.
    pub review: String,
    /// Output of the text cleaner.
    pub cleaned_review: String,
    /// Cleaned text with stopwords removed.
    pub normalized_review: String,
    /// Three-way label computed from the normalized text.
    pub sentiment: Sentiment,
    /// Up to three keyphrases joined by `", "`.
    pub topics: String,
    /// Generated summary, the input itself when too short, or `Error: ...`.
    pub summary: String,
}

/// Errors raised while assembling the service from configuration.
#[derive(Debug, Error)]
pub enum ServiceInitError {
    /// The configured sentiment lexicon could not be loaded.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    /// The embedding client could not be constructed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingClientError),
    /// The summarization client could not be constructed.
    #[error(transparent)]
    Summarization(#[from] SummarizationClientError),
}

/// Abstraction over the pipeline used by external surfaces (HTTP, batch).
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Analyze every review in input order.
    async fn analyze_reviews(&self, reviews: Vec<String>) -> Vec<AnalysisResult>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Runs the full pipeline with injected collaborators.
pub struct AnalysisService {
    scorer: Box<dyn PolarityScorer>,
    ranker: Box<dyn KeyphraseRanker>,
    summarizer: Box<dyn SummarizationClient>,
    metrics: Arc<PipelineMetrics>,
}

impl AnalysisService {
    /// Assemble a service from explicit collaborators.
    pub fn new(
        scorer: Box<dyn PolarityScorer>,
        ranker: Box<dyn KeyphraseRanker>,
        summarizer: Box<dyn SummarizationClient>,
    ) -> Self {
        Self {
            scorer,
            ranker,
            summarizer,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build every collaborator described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ServiceInitError> {
        let scorer: Box<dyn PolarityScorer> = match &config.sentiment_lexicon_path {
            Some(path) => {
                let scorer = LexiconScorer::from_vader_file(path)?;
                tracing::info!(path = %path.display(), entries = scorer.len(), "Loaded sentiment lexicon");
                Box::new(scorer)
            }
            None => Box::new(VaderScorer::new()),
        };

        tracing::info!(provider = ?config.embedding_provider, model = %config.embedding_model, "Initializing embedding client");
        let ranker = EmbeddingKeyphraseRanker::new(get_embedding_client(config)?);

        tracing::info!(provider = ?config.summarization_provider, model = %config.summarization_model, "Initializing summarization client");
        let summarizer = get_summarization_client(config)?;

        Ok(Self::new(scorer, Box::new(ranker), summarizer))
    }

    /// Shared handle to the pipeline counters.
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every stage on a single review. Never fails.
    pub async fn analyze(&self, review: &str) -> AnalysisResult {
        let cleaned_review = clean(review);
        let normalized_review = remove_stopwords(&cleaned_review);

        let sentiment = classify(self.scorer.as_ref(), &normalized_review);

        let topics = match extract_topics(self.ranker.as_ref(), &normalized_review).await {
            Ok(topics) => topics,
            Err(error) => {
                tracing::warn!(%error, "Topic extraction failed; leaving topics empty");
                self.metrics.record_topic_failure();
                String::new()
            }
        };

        let outcome = summarize(
            self.summarizer.as_ref(),
            &normalized_review,
            SUMMARY_MAX_NEW_TOKENS,
        )
        .await;
        match &outcome {
            SummaryOutcome::Passthrough(_) => self.metrics.record_summary_passthrough(),
            SummaryOutcome::Generated(_) => self.metrics.record_summary_generated(),
            SummaryOutcome::Failed(_) => self.metrics.record_summary_failure(),
        }

        self.metrics.record_review(sentiment);
        tracing::debug!(%sentiment, topics = %topics, "Review analyzed");

        AnalysisResult {
            review: review.to_string(),
            cleaned_review,
            normalized_review,
            sentiment,
            topics,
            summary: outcome.into_text(),
        }
    }

    /// Analyze reviews one after another, preserving input order.
    pub async fn analyze_all(&self, reviews: &[String]) -> Vec<AnalysisResult> {
        let mut results = Vec::with_capacity(reviews.len());
        for review in reviews {
            results.push(self.analyze(review).await);
        }
        tracing::info!(count = results.len(), "Analyzed review batch");
        results
    }
}

#[async_trait]
impl AnalysisApi for AnalysisService {
    async fn analyze_reviews(&self, reviews: Vec<String>) -> Vec<AnalysisResult> {
        self.analyze_all(&reviews).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
