//! Review sources for the batch driver and seeded sampling.
//!
//! Reviews come either from a local CSV file or from the Hugging Face datasets server. Both
//! sources drop rows whose review is missing before sampling. Missing means null or absent on
//! the datasets server. In CSV, where there is no null, it means an empty cell or one of the
//! usual NA markers. An empty JSON string is kept as a review.

mod hub;

pub use hub::{DEFAULT_HUB_URL, HubClient, HubQuery, PAGE_SIZE};

use rand::{SeedableRng, rngs::StdRng};
use std::io::Read;
use thiserror::Error;

/// Column names recognised as the review text, in priority order.
pub const REVIEW_COLUMNS: [&str; 3] = ["review", "content", "text"];

/// CSV cell values read as missing, matched exactly.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors raised while loading or sampling reviews.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Underlying file could not be read.
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    /// CSV input was malformed.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    /// None of the recognised review columns is present.
    #[error("no review column found (expected one of review, content, text; got {available:?})")]
    MissingColumn {
        /// Headers present in the input.
        available: Vec<String>,
    },
    /// The remote dataset server could not be reached or returned an error.
    #[error("dataset server request failed: {0}")]
    Http(String),
    /// The remote dataset server returned an unexpected payload.
    #[error("unexpected dataset server response: {0}")]
    InvalidResponse(String),
    /// More rows were requested than are available.
    #[error("cannot sample {requested} reviews from {available} available")]
    SampleTooLarge {
        /// Rows requested.
        requested: usize,
        /// Rows left after dropping missing reviews.
        available: usize,
    },
}

/// Read reviews from CSV, using the first recognised review column.
///
/// Rows whose review cell is absent, empty or an [`NA_MARKERS`] value are dropped.
pub fn load_csv_reviews<R: Read>(reader: R) -> Result<Vec<String>, DatasetError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv.headers()?.clone();
    let column = REVIEW_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|header| header.trim() == *name))
        .ok_or_else(|| DatasetError::MissingColumn {
            available: headers.iter().map(str::to_string).collect(),
        })?;

    let mut reviews = Vec::new();
    let mut dropped = 0usize;
    for record in csv.records() {
        let record = record?;
        match record.get(column) {
            Some(review) if !NA_MARKERS.contains(&review) => reviews.push(review.to_string()),
            _ => dropped += 1,
        }
    }
    tracing::debug!(
        column = &headers[column],
        loaded = reviews.len(),
        dropped,
        "Loaded reviews from CSV"
    );
    Ok(reviews)
}

/// Draw `sample_size` reviews without replacement using a seeded generator.
///
/// The same `(reviews, sample_size, seed)` always produces the same selection and order.
pub fn sample_reviews(
    reviews: Vec<String>,
    sample_size: usize,
    seed: u64,
) -> Result<Vec<String>, DatasetError> {
    if sample_size > reviews.len() {
        return Err(DatasetError::SampleTooLarge {
            requested: sample_size,
            available: reviews.len(),
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let picks = rand::seq::index::sample(&mut rng, reviews.len(), sample_size);

    let mut slots: Vec<Option<String>> = reviews.into_iter().map(Some).collect();
    Ok(picks
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect())
}
