//! Three-way sentiment labelling on top of a polarity scorer.

mod lexicon;
mod vader;

pub use lexicon::{LexiconError, LexiconScorer};
pub use vader::VaderScorer;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compound scores at or above this value are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this value are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Sentiment label assigned to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Compound score `>= 0.05`.
    Positive,
    /// Compound score `<= -0.05`.
    Negative,
    /// Everything in between, including empty text.
    Neutral,
}

impl Sentiment {
    /// Map a compound score to a label.
    pub fn from_compound(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Lowercase label as emitted in JSON and CSV.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface implemented by polarity scorers.
///
/// Implementations return a compound score in `[-1, 1]` and must accept any string,
/// including the empty string.
pub trait PolarityScorer: Send + Sync {
    /// Aggregate polarity of `text`.
    fn compound(&self, text: &str) -> f64;
}

/// Label `text` using the supplied scorer.
pub fn classify(scorer: &dyn PolarityScorer, text: &str) -> Sentiment {
    Sentiment::from_compound(scorer.compound(text))
}
