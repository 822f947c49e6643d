//! Sentiment scoring for review snippets.
//!
//! Text is cleaned to alphanumerics and whitespace, handed to a
//! [`PolarityEstimator`], rounded to three decimals and labelled with the
//! fixed `±0.1` partition from [`SentimentLabel::from_score`].

use std::sync::Arc;

use revdb_core::SentimentLabel;

/// Polarity in `[-1.0, 1.0]` for already-cleaned text.
pub trait PolarityEstimator: Send + Sync {
    fn polarity(&self, cleaned: &str) -> f64;
}

/// Word polarities for product-review language.
///
/// Keys are lowercase single words. The estimator averages the polarity of
/// every matched word.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("comfortable", 0.4),
    ("decent", 0.17),
    ("durable", 0.4),
    ("easy", 0.43),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("fine", 0.42),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("impressive", 1.0),
    ("love", 0.5),
    ("loved", 0.7),
    ("nice", 0.6),
    ("ok", 0.5),
    ("okay", 0.5),
    ("perfect", 1.0),
    ("pleased", 0.5),
    ("recommend", 0.4),
    ("recommended", 0.4),
    ("reliable", 0.5),
    ("satisfied", 0.5),
    ("smooth", 0.4),
    ("solid", 0.3),
    ("sturdy", 0.4),
    ("superb", 1.0),
    ("useful", 0.3),
    ("wonderful", 1.0),
    ("worth", 0.3),
    // Negative
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("broke", -0.4),
    ("broken", -0.4),
    ("cheap", -0.2),
    ("damaged", -0.5),
    ("dead", -0.2),
    ("defective", -0.6),
    ("died", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("fake", -0.5),
    ("faulty", -0.5),
    ("flimsy", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("laggy", -0.4),
    ("overpriced", -0.5),
    ("poor", -0.4),
    ("problem", -0.3),
    ("slow", -0.3),
    ("stopped", -0.3),
    ("terrible", -1.0),
    ("useless", -0.5),
    ("waste", -0.2),
    ("worse", -0.4),
    ("worst", -1.0),
];

/// Words that flip and halve the polarity of the next matched word.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "cant",
    "cannot", "wont", "hardly",
];

/// Words that scale the polarity of the next matched word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("super", 1.3),
    ("so", 1.3),
    ("quite", 1.1),
    ("too", 1.2),
];

const NEGATION_FACTOR: f64 = -0.5;

/// Lexicon-averaging estimator with one-word negation and intensifier lookbehind.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconPolarity;

impl PolarityEstimator for LexiconPolarity {
    fn polarity(&self, cleaned: &str) -> f64 {
        let words: Vec<String> = cleaned
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut total = 0.0_f64;
        let mut matched = 0_u32;

        for (i, word) in words.iter().enumerate() {
            let Some(base) = lookup(word) else {
                continue;
            };

            let mut value = base;
            let mut back = i;
            if let Some(scale) = back
                .checked_sub(1)
                .and_then(|prev| intensifier(&words[prev]))
            {
                value *= scale;
                back -= 1;
            }
            if back
                .checked_sub(1)
                .is_some_and(|prev| NEGATIONS.contains(&words[prev].as_str()))
            {
                value *= NEGATION_FACTOR;
            }

            total += value.clamp(-1.0, 1.0);
            matched += 1;
        }

        if matched == 0 {
            return 0.0;
        }
        (total / f64::from(matched)).clamp(-1.0, 1.0)
    }
}

fn lookup(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, weight)| weight)
}

fn intensifier(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, scale)| scale)
}

/// Keep only alphanumerics and whitespace, then trim.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Pure text → `(label, score)` scorer.
#[derive(Clone)]
pub struct SentimentScorer {
    estimator: Arc<dyn PolarityEstimator>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(Arc::new(LexiconPolarity))
    }
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer").finish_non_exhaustive()
    }
}

impl SentimentScorer {
    #[must_use]
    pub fn new(estimator: Arc<dyn PolarityEstimator>) -> Self {
        Self { estimator }
    }

    /// Score `text`. Never fails; empty or symbol-only text is neutral `0.0`.
    #[must_use]
    pub fn score(&self, text: &str) -> (SentimentLabel, f64) {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return (SentimentLabel::Neutral, 0.0);
        }

        let raw = self.estimator.polarity(&cleaned);
        let score = if raw.is_finite() {
            (raw.clamp(-1.0, 1.0) * 1000.0).round() / 1000.0
        } else {
            0.0
        };
        (SentimentLabel::from_score(score), score)
    }
}
