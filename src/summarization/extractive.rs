use async_trait::async_trait;

use super::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use crate::text::split_words;

/// Deterministic lead summary used when no generation model is configured.
///
/// Keeps the first `word_count / 2` words, clamped to the request's token bounds.
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    fn lead(request: &SummarizationRequest) -> String {
        let words: Vec<&str> = split_words(&request.text).collect();
        let upper = request.max_tokens.max(request.min_tokens);
        let budget = (words.len() / 2).clamp(request.min_tokens, upper);
        words
            .into_iter()
            .take(budget)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SummarizationClient for ExtractiveSummarizer {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        Ok(Self::lead(&request))
    }
}
