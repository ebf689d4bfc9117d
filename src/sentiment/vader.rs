//! Default scorer backed by the complete VADER lexicon and rule set.

use vader_sentiment::SentimentIntensityAnalyzer;

use super::PolarityScorer;

/// VADER compound scoring via the `vader_sentiment` port.
///
/// The analyzer only borrows the crate's static lexicons, so one is built per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct VaderScorer;

impl VaderScorer {
    /// Scorer over the full bundled lexicon.
    pub fn new() -> Self {
        Self
    }
}

impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        SentimentIntensityAnalyzer::new()
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}
