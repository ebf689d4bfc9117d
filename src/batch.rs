//! Batch runs over a sampled review set.
//!
//! The batch driver reuses [`AnalysisService`] so its rows match what `POST /analyze` returns for
//! the same reviews.

use crate::dataset::{DatasetError, HubClient, HubQuery, load_csv_reviews, sample_reviews};
use crate::export::NormalizedRow;
use crate::pipeline::{AnalysisResult, AnalysisService};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

/// Where batch reviews come from.
#[derive(Debug, Clone)]
pub enum ReviewSource {
    /// Local CSV file with a `review`, `content` or `text` column.
    Csv(PathBuf),
    /// Leading rows of a split served by the datasets server.
    Hub {
        /// Server base URL.
        base_url: String,
        /// Dataset split to read.
        query: HubQuery,
        /// Number of leading rows fetched before sampling.
        pool_size: usize,
    },
}

impl ReviewSource {
    /// Load every usable review from the source.
    pub async fn load(&self, timeout: Duration) -> Result<Vec<String>, DatasetError> {
        match self {
            Self::Csv(path) => {
                let file = File::open(path)?;
                load_csv_reviews(BufReader::new(file))
            }
            Self::Hub {
                base_url,
                query,
                pool_size,
            } => {
                HubClient::new(base_url.clone(), timeout)?
                    .fetch_reviews(query, *pool_size)
                    .await
            }
        }
    }

    /// Load the source and draw a seeded sample from it.
    pub async fn sample(
        &self,
        timeout: Duration,
        sample_size: usize,
        seed: u64,
    ) -> Result<Vec<String>, DatasetError> {
        let reviews = self.load(timeout).await?;
        let available = reviews.len();
        let sampled = sample_reviews(reviews, sample_size, seed)?;
        tracing::info!(available, sampled = sampled.len(), seed, "Sampled reviews");
        Ok(sampled)
    }
}

/// Clean and normalize every review, preserving order.
pub fn preprocess(reviews: Vec<String>) -> Vec<NormalizedRow> {
    reviews.into_iter().map(NormalizedRow::from_review).collect()
}

/// Run the full pipeline over every review, preserving order.
pub async fn analyze(service: &AnalysisService, reviews: &[String]) -> Vec<AnalysisResult> {
    service.analyze_all(reviews).await
}

/// Preview cells for normalized rows.
pub fn normalized_preview_rows(rows: &[NormalizedRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| vec![row.review.clone(), row.normalized_review.clone()])
        .collect()
}

/// Preview cells for analysis results: review, sentiment and topics.
pub fn analysis_preview_rows(results: &[AnalysisResult]) -> Vec<Vec<String>> {
    results
        .iter()
        .map(|result| {
            vec![
                result.review.clone(),
                result.sentiment.to_string(),
                result.topics.clone(),
            ]
        })
        .collect()
}
