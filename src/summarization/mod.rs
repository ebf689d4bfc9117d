//! Abstractive summarization of reviews via pluggable providers.
//!
//! When no provider is configured the pipeline falls back to a deterministic extractive lead
//! summary. Provider failures never escape [`summarize`]; they come back as
//! [`SummaryOutcome::Failed`] and are embedded in the result as `Error: <message>`.

mod extractive;
mod ollama;

pub use extractive::ExtractiveSummarizer;
pub use ollama::OllamaSummarizationClient;

use crate::config::{Config, SummarizationProvider};
use crate::text::word_count;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Lower bound on generated summary length, in tokens.
pub const MIN_SUMMARY_TOKENS: usize = 10;
/// Inputs with fewer words than this are returned unchanged.
pub const MIN_WORDS_TO_SUMMARIZE: usize = 5;

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was explicitly disabled or unreachable.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    /// Text to summarize.
    pub text: String,
    /// Minimum output length in tokens.
    pub min_tokens: usize,
    /// Maximum output length in tokens.
    pub max_tokens: usize,
}

/// Interface implemented by summarization providers.
///
/// Implementations decode greedily so the same input yields the same summary.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary within the requested length bounds.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Result of the summarization stage for one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Input was empty or too short; returned as-is.
    Passthrough(String),
    /// Provider produced a summary.
    Generated(String),
    /// Provider failed with the given message.
    Failed(String),
}

impl SummaryOutcome {
    /// Text placed in the `summary` field of a result.
    pub fn into_text(self) -> String {
        match self {
            Self::Passthrough(text) | Self::Generated(text) => text,
            Self::Failed(message) => format!("Error: {message}"),
        }
    }
}

impl fmt::Display for SummaryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough(text) | Self::Generated(text) => f.write_str(text),
            Self::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Summarize `text`, allowing up to `word_count(text) + max_new_tokens` output tokens.
pub async fn summarize(
    client: &dyn SummarizationClient,
    text: &str,
    max_new_tokens: usize,
) -> SummaryOutcome {
    let words = word_count(text);
    if text.trim().is_empty() || words < MIN_WORDS_TO_SUMMARIZE {
        return SummaryOutcome::Passthrough(text.to_string());
    }

    let request = SummarizationRequest {
        text: text.to_string(),
        min_tokens: MIN_SUMMARY_TOKENS,
        max_tokens: words + max_new_tokens,
    };
    match client.generate_summary(request).await {
        Ok(summary) => SummaryOutcome::Generated(summary),
        Err(error) => {
            tracing::warn!(%error, words, "Summarization failed; embedding error in result");
            SummaryOutcome::Failed(error.to_string())
        }
    }
}

/// Build a summarization client based on configuration.
pub fn get_summarization_client(
    config: &Config,
) -> Result<Box<dyn SummarizationClient>, SummarizationClientError> {
    match config.summarization_provider {
        SummarizationProvider::None => Ok(Box::new(ExtractiveSummarizer)),
        SummarizationProvider::Ollama => Ok(Box::new(OllamaSummarizationClient::new(
            config.ollama_url.clone(),
            config.summarization_model.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )?)),
    }
}
