//! VADER-style lexicon scorer.
//!
//! Valences follow the VADER convention (roughly `[-4, 4]` per token). Each token's valence is
//! adjusted by up to three preceding booster or negation words, sentiment after a contrastive
//! "but" outweighs sentiment before it, and the summed valence is squashed into `[-1, 1]`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use super::PolarityScorer;

/// Valence added (or subtracted) by an intensifying booster word.
const BOOSTER_INCREMENT: f64 = 0.293;
/// Multiplier applied to a valence under negation.
const NEGATION_SCALAR: f64 = -0.74;
/// Normalization constant approximating the maximum expected summed valence.
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Built-in valence table: a compact review vocabulary on the VADER valence scale.
const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // Positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("beautifully", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("bargain", 0.8),
    ("brilliant", 2.8),
    ("comfortable", 2.3),
    ("comfy", 1.8),
    ("cool", 1.3),
    ("cute", 2.0),
    ("delight", 2.9),
    ("delighted", 2.9),
    ("delightful", 2.9),
    ("easy", 1.9),
    ("effective", 2.1),
    ("elegant", 2.1),
    ("enjoy", 2.2),
    ("enjoyable", 1.9),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fabulous", 2.4),
    ("fantastic", 2.6),
    ("fast", 0.9),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("incredible", 2.2),
    ("interesting", 1.7),
    ("like", 2.0),
    ("liked", 1.8),
    ("lovely", 2.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("masterpiece", 3.1),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("perfectly", 3.2),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("powerful", 1.8),
    ("pretty", 2.2),
    ("quality", 1.7),
    ("recommend", 1.5),
    ("recommended", 0.8),
    ("reliable", 1.7),
    ("satisfied", 1.8),
    ("smooth", 0.5),
    ("solid", 0.6),
    ("sturdy", 1.0),
    ("superb", 3.1),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("useful", 1.9),
    ("value", 1.4),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("works", 0.8),
    ("worth", 0.9),
    ("wow", 2.8),
    // Negative
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("awful", -2.0),
    ("bad", -2.5),
    ("badly", -2.1),
    ("boring", -1.3),
    ("broke", -1.8),
    ("broken", -2.1),
    ("cheap", -0.6),
    ("complain", -1.5),
    ("complaint", -1.2),
    ("crap", -1.6),
    ("damaged", -1.9),
    ("dead", -3.3),
    ("defective", -1.9),
    ("died", -2.6),
    ("difficult", -1.5),
    ("disappoint", -2.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("dislike", -1.6),
    ("dull", -1.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fake", -2.1),
    ("flawed", -2.3),
    ("garbage", -1.7),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("junk", -1.8),
    ("lame", -1.8),
    ("mediocre", -1.0),
    ("mess", -1.5),
    ("miss", -0.6),
    ("missing", -1.2),
    ("no", -1.2),
    ("noisy", -0.7),
    ("overpriced", -1.4),
    ("pathetic", -2.6),
    ("poor", -2.1),
    ("poorly", -1.8),
    ("problem", -1.7),
    ("problems", -1.7),
    ("refund", -0.4),
    ("regret", -1.9),
    ("ridiculous", -1.5),
    ("rude", -2.0),
    ("sad", -2.1),
    ("scam", -2.5),
    ("slow", -0.8),
    ("sorry", -0.3),
    ("stupid", -2.4),
    ("terrible", -2.1),
    ("trash", -2.1),
    ("ugly", -2.3),
    ("unfortunately", -1.4),
    ("unhappy", -1.8),
    ("unreliable", -1.6),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("weak", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("worthless", -1.9),
    ("wrong", -2.1),
];

/// Intensifiers (positive scalar) and dampeners (negative scalar).
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("amazingly", BOOSTER_INCREMENT),
    ("completely", BOOSTER_INCREMENT),
    ("deeply", BOOSTER_INCREMENT),
    ("especially", BOOSTER_INCREMENT),
    ("exceptionally", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("fully", BOOSTER_INCREMENT),
    ("greatly", BOOSTER_INCREMENT),
    ("highly", BOOSTER_INCREMENT),
    ("hugely", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("more", BOOSTER_INCREMENT),
    ("most", BOOSTER_INCREMENT),
    ("particularly", BOOSTER_INCREMENT),
    ("quite", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("remarkably", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("super", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT),
    ("truly", BOOSTER_INCREMENT),
    ("utterly", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("almost", -BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("hardly", -BOOSTER_INCREMENT),
    ("kinda", -BOOSTER_INCREMENT),
    ("less", -BOOSTER_INCREMENT),
    ("little", -BOOSTER_INCREMENT),
    ("marginally", -BOOSTER_INCREMENT),
    ("partly", -BOOSTER_INCREMENT),
    ("scarcely", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
    ("sorta", -BOOSTER_INCREMENT),
];

/// Negation words, including apostrophe-free contractions left behind by cleanup.
const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "neither", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
    "rarely", "seldom", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

/// Errors raised while loading an external lexicon file.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The lexicon file could not be read.
    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),
    /// A line did not contain a token and a numeric valence.
    #[error("malformed lexicon line {line}: {reason}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
    /// The file contained no entries.
    #[error("lexicon is empty")]
    Empty,
}

/// Rule-based polarity scorer backed by a token valence table.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl LexiconScorer {
    /// Scorer using the compact built-in table, independent of the bundled VADER data.
    pub fn builtin() -> Self {
        Self {
            valences: BUILTIN_LEXICON
                .iter()
                .map(|&(token, valence)| (token.to_string(), valence))
                .collect(),
        }
    }

    /// Load a VADER-format lexicon (`token<TAB>mean<TAB>...` per line).
    pub fn from_vader_file(path: &Path) -> Result<Self, LexiconError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a VADER-format lexicon from any buffered reader. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut valences = HashMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().map(str::trim).unwrap_or_default();
            let raw = fields.next().ok_or_else(|| LexiconError::Malformed {
                line: index + 1,
                reason: "missing valence column".into(),
            })?;
            let valence = raw.trim().parse::<f64>().map_err(|e| LexiconError::Malformed {
                line: index + 1,
                reason: e.to_string(),
            })?;
            valences.insert(token.to_lowercase(), valence);
        }
        if valences.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(Self { valences })
    }

    /// Number of tokens carrying a valence.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// Returns `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    fn token_valence(&self, tokens: &[String], index: usize) -> f64 {
        let token = tokens[index].as_str();
        if booster_scalar(token).is_some() {
            return 0.0;
        }
        if token == "kind" && tokens.get(index + 1).map(String::as_str) == Some("of") {
            return 0.0;
        }
        let Some(&base) = self.valences.get(token) else {
            return 0.0;
        };

        let mut valence = base;
        for distance in 1..=3 {
            if index < distance {
                break;
            }
            let prior = tokens[index - distance].as_str();
            if self.valences.contains_key(prior) {
                continue;
            }
            if let Some(scalar) = booster_scalar(prior) {
                let mut scalar = if valence < 0.0 { -scalar } else { scalar };
                if distance == 2 {
                    scalar *= 0.95;
                } else if distance == 3 {
                    scalar *= 0.9;
                }
                valence += scalar;
            }
            if NEGATIONS.contains(&prior) {
                valence *= NEGATION_SCALAR;
            }
        }
        valence
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PolarityScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let mut sentiments: Vec<f64> = (0..tokens.len())
            .map(|index| self.token_valence(&tokens, index))
            .collect();

        if let Some(pivot) = tokens.iter().position(|token| token == "but") {
            for (index, sentiment) in sentiments.iter_mut().enumerate() {
                if index < pivot {
                    *sentiment *= 0.5;
                } else if index > pivot {
                    *sentiment *= 1.5;
                }
            }
        }

        normalize(sentiments.iter().sum())
    }
}

fn booster_scalar(token: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, scalar)| scalar)
}

fn normalize(score: f64) -> f64 {
    if score == 0.0 {
        return 0.0;
    }
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
