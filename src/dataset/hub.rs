use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{DatasetError, REVIEW_COLUMNS};

/// Public Hugging Face datasets server.
pub const DEFAULT_HUB_URL: &str = "https://datasets-server.huggingface.co";
/// Rows requested per page; the server caps pages at this size.
pub const PAGE_SIZE: usize = 100;

/// Identifies one split of a hosted dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubQuery {
    /// Dataset id, e.g. `amazon_polarity`.
    pub dataset: String,
    /// Dataset configuration name.
    pub config: String,
    /// Split name, e.g. `train`.
    pub split: String,
}

impl HubQuery {
    /// Query using the dataset's default configuration, named after the dataset itself.
    pub fn new(dataset: impl Into<String>, split: impl Into<String>) -> Self {
        let dataset = dataset.into();
        let config = dataset
            .rsplit('/')
            .next()
            .unwrap_or(dataset.as_str())
            .to_string();
        Self {
            dataset,
            config,
            split: split.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    num_rows_total: usize,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: serde_json::Map<String, Value>,
}

/// Pages reviews out of the datasets server `/rows` endpoint.
pub struct HubClient {
    http: Client,
    base_url: String,
}

impl HubClient {
    /// Build a client against `base_url` (normally [`DEFAULT_HUB_URL`]).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DatasetError> {
        let http = Client::builder()
            .user_agent("reviewlens/batch")
            .timeout(timeout)
            .build()
            .map_err(|error| DatasetError::Http(error.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch up to `pool_size` leading rows of the split and extract their review text.
    ///
    /// Rows with no string value in a recognised review column are dropped, so the result may be
    /// shorter than `pool_size`.
    pub async fn fetch_reviews(
        &self,
        query: &HubQuery,
        pool_size: usize,
    ) -> Result<Vec<String>, DatasetError> {
        let mut reviews = Vec::with_capacity(pool_size);
        let mut offset = 0usize;
        let mut dropped = 0usize;

        while offset < pool_size {
            let length = PAGE_SIZE.min(pool_size - offset);
            let page = self.fetch_page(query, offset, length).await?;
            let fetched = page.rows.len();
            for entry in page.rows {
                match review_text(&entry.row) {
                    Some(text) => reviews.push(text),
                    None => dropped += 1,
                }
            }
            offset += fetched;
            tracing::debug!(offset, total = page.num_rows_total, "Fetched dataset page");
            if fetched == 0 || offset >= page.num_rows_total {
                break;
            }
        }

        tracing::info!(
            dataset = %query.dataset,
            split = %query.split,
            loaded = reviews.len(),
            dropped,
            "Fetched reviews from dataset server"
        );
        Ok(reviews)
    }

    async fn fetch_page(
        &self,
        query: &HubQuery,
        offset: usize,
        length: usize,
    ) -> Result<RowsPage, DatasetError> {
        let url = format!("{}/rows", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[
                ("dataset", query.dataset.as_str()),
                ("config", query.config.as_str()),
                ("split", query.split.as_str()),
            ])
            .query(&[("offset", offset), ("length", length)])
            .send()
            .await
            .map_err(|error| DatasetError::Http(format!("failed to reach {url}: {error}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DatasetError::Http(format!("{url} returned {status}: {body}")));
        }

        response
            .json::<RowsPage>()
            .await
            .map_err(|error| DatasetError::InvalidResponse(error.to_string()))
    }
}

/// Only null or absent cells count as missing; an empty string is a review.
fn review_text(row: &serde_json::Map<String, Value>) -> Option<String> {
    REVIEW_COLUMNS.iter().find_map(|column| match row.get(*column) {
        Some(Value::String(text)) => Some(text.clone()),
        _ => None,
    })
}
