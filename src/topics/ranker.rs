use async_trait::async_trait;

use super::{Keyphrase, KeyphraseError, KeyphraseRanker, candidate_phrases};
use crate::embedding::EmbeddingClient;

/// Ranks candidate phrases by cosine similarity between their embedding and the text's.
///
/// The document and every candidate are embedded in a single provider call.
pub struct EmbeddingKeyphraseRanker {
    embeddings: Box<dyn EmbeddingClient>,
}

impl EmbeddingKeyphraseRanker {
    /// Wrap an embedding client.
    pub fn new(embeddings: Box<dyn EmbeddingClient>) -> Self {
        Self { embeddings }
    }
}

#[async_trait]
impl KeyphraseRanker for EmbeddingKeyphraseRanker {
    async fn rank(&self, text: &str, top_n: usize) -> Result<Vec<Keyphrase>, KeyphraseError> {
        let candidates = candidate_phrases(text);
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let mut inputs = Vec::with_capacity(candidates.len() + 1);
        inputs.push(text.to_string());
        inputs.extend(candidates.iter().cloned());
        let vectors = self.embeddings.generate_embeddings(inputs).await?;

        let Some((document, phrase_vectors)) = vectors.split_first() else {
            return Err(KeyphraseError::Ranking("no embeddings returned".into()));
        };
        if phrase_vectors.len() != candidates.len() {
            return Err(KeyphraseError::Ranking(format!(
                "expected {} candidate embeddings, got {}",
                candidates.len(),
                phrase_vectors.len()
            )));
        }

        let mut scored = candidates
            .into_iter()
            .zip(phrase_vectors)
            .map(|(phrase, vector)| {
                cosine_similarity(document, vector).map(|score| Keyphrase { phrase, score })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps alphabetical order among equal scores.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_n);
        tracing::trace!(?scored, "Ranked keyphrases");
        Ok(scored)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, KeyphraseError> {
    if a.len() != b.len() {
        return Err(KeyphraseError::Ranking(format!(
            "embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingClientError, HashedEmbeddingClient};

    /// Embeds each text as its lowercase letter histogram.
    struct LetterEmbeddings;

    #[async_trait]
    impl EmbeddingClient for LetterEmbeddings {
        async fn generate_embeddings(
            &self,
            texts: Vec<String>,
        ) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut v = vec![0.0; 26];
                    for c in text.chars().filter(char::is_ascii_lowercase) {
                        v[(c as u8 - b'a') as usize] += 1.0;
                    }
                    v
                })
                .collect())
        }
    }

    struct ShortEmbeddings;

    #[async_trait]
    impl EmbeddingClient for ShortEmbeddings {
        async fn generate_embeddings(
            &self,
            _texts: Vec<String>,
        ) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    struct FailingEmbeddings;

    #[async_trait]
    impl EmbeddingClient for FailingEmbeddings {
        async fn generate_embeddings(
            &self,
            _texts: Vec<String>,
        ) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
            Err(EmbeddingClientError::ProviderUnavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn returns_at_most_top_n_sorted_by_score() {
        let ranker = EmbeddingKeyphraseRanker::new(Box::new(LetterEmbeddings));
        let ranked = ranker
            .rank("battery life great battery", 3)
            .await
            .expect("ranked");
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn repeated_words_rank_first_with_hashed_embeddings() {
        let ranker = EmbeddingKeyphraseRanker::new(Box::new(HashedEmbeddingClient::new(512)));
        let ranked = ranker
            .rank("battery battery battery screen", 1)
            .await
            .expect("ranked");
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].phrase.starts_with("battery"), "got {ranked:?}");
    }

    #[tokio::test]
    async fn no_candidates_means_no_provider_call() {
        let ranker = EmbeddingKeyphraseRanker::new(Box::new(FailingEmbeddings));
        let ranked = ranker.rank("one two three", 3).await.expect("ranked");
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let ranker = EmbeddingKeyphraseRanker::new(Box::new(FailingEmbeddings));
        let error = ranker.rank("battery life", 3).await.expect_err("failure");
        assert!(matches!(error, KeyphraseError::Embedding(_)));
    }

    #[tokio::test]
    async fn short_provider_response_is_rejected() {
        let ranker = EmbeddingKeyphraseRanker::new(Box::new(ShortEmbeddings));
        let error = ranker.rank("battery life", 3).await.expect_err("mismatch");
        assert!(matches!(error, KeyphraseError::Ranking(_)));
    }

    #[test]
    fn cosine_handles_zero_vectors_and_mismatch() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).expect("cos"), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]).expect("cos") - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_err());
    }
}
