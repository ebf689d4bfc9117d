//! Topic extraction: top keyphrases of a review joined into one string.

mod candidates;
mod ranker;

pub use candidates::candidate_phrases;
pub use ranker::EmbeddingKeyphraseRanker;

use async_trait::async_trait;
use thiserror::Error;

use crate::embedding::EmbeddingClientError;

/// Number of keyphrases kept per review.
pub const TOP_N: usize = 3;

/// Errors raised while ranking keyphrases.
#[derive(Debug, Error)]
pub enum KeyphraseError {
    /// The embedding backend failed.
    #[error("keyphrase embedding failed: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// The backend returned vectors that cannot be compared.
    #[error("keyphrase ranking failed: {0}")]
    Ranking(String),
}

/// A keyphrase with its similarity to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyphrase {
    /// One- or two-word phrase.
    pub phrase: String,
    /// Cosine similarity to the whole text.
    pub score: f32,
}

/// Interface implemented by keyphrase rankers.
#[async_trait]
pub trait KeyphraseRanker: Send + Sync {
    /// Return at most `top_n` keyphrases, best first.
    async fn rank(&self, text: &str, top_n: usize) -> Result<Vec<Keyphrase>, KeyphraseError>;
}

/// Extract up to [`TOP_N`] keyphrases from `text` and join them with `", "`.
///
/// Blank input short-circuits to an empty string without consulting the ranker. The ranker's
/// ordering is preserved.
pub async fn extract_topics(
    ranker: &dyn KeyphraseRanker,
    text: &str,
) -> Result<String, KeyphraseError> {
    if text.trim().is_empty() {
        return Ok(String::new());
    }
    let phrases = ranker.rank(text, TOP_N).await?;
    Ok(phrases
        .into_iter()
        .take(TOP_N)
        .map(|keyphrase| keyphrase.phrase)
        .collect::<Vec<_>>()
        .join(", "))
}
