use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Scores strictly above this are positive.
const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores strictly below this are negative.
const NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Fixed partition of the score range.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Self::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Self::Positive),
            "Neutral" => Ok(Self::Neutral),
            "Negative" => Ok(Self::Negative),
            other => Err(CoreError::InvalidSentimentLabel(other.to_string())),
        }
    }
}

/// A scored snippet ready to be written as one `reviews` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReview {
    /// The query string the pipeline was invoked with, verbatim.
    pub product_query: String,
    /// Review text, already truncated.
    pub text: String,
    pub sentiment_label: SentimentLabel,
    /// Polarity in `[-1.0, 1.0]`.
    pub sentiment_score: f64,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
}

/// Truncate `text` to at most `max_chars` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
