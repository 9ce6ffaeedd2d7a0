//! Core data types shared by the scorer, the classifier and the evaluator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) of the compound score for a positive label
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Upper bound (inclusive) of the compound score for a negative label
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Sentiment polarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Negative sentiment
    Negative,
    /// Neutral sentiment
    Neutral,
    /// Positive sentiment
    Positive,
}

impl Polarity {
    /// All labels in report order
    pub const ALL: [Polarity; 3] = [Polarity::Negative, Polarity::Neutral, Polarity::Positive];

    /// Bucket a compound score into a label.
    ///
    /// `score >= 0.05` is positive, `score <= -0.05` is negative, everything
    /// in between (and NaN) is neutral.
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Polarity::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    /// Map the integer label codes used by tweet corpora (0, 2, 4)
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Polarity::Negative),
            2 => Some(Polarity::Neutral),
            4 => Some(Polarity::Positive),
            _ => None,
        }
    }

    /// Binary training target: 1.0 for positive, 0.0 for everything else.
    ///
    /// Neutral rows land in the negative class.
    pub fn binary_target(self) -> f64 {
        match self {
            Polarity::Positive => 1.0,
            Polarity::Neutral | Polarity::Negative => 0.0,
        }
    }

    /// Collapse a three-way label onto the binary classifier's label space
    pub fn to_binary(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Positive,
            Polarity::Neutral | Polarity::Negative => Polarity::Negative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
            Polarity::Positive => "positive",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled text after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Tweet text (may be empty)
    pub text: String,
    /// Ground-truth label
    pub label: Polarity,
}

impl Record {
    pub fn new(text: impl Into<String>, label: Polarity) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Result of lexicon scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Original text
    pub text: String,
    /// Normalized compound score in [-1, 1]
    pub compound: f64,
    /// Share of positive sentiment mass
    pub positive: f64,
    /// Share of neutral tokens
    pub neutral: f64,
    /// Share of negative sentiment mass
    pub negative: f64,
    /// Label bucketed from `compound`
    pub polarity: Polarity,
    /// Words that contributed to the score
    pub key_words: Vec<ScoredWord>,
}

impl ScoreResult {
    /// Result for text with nothing to score
    pub fn neutral(text: &str) -> Self {
        Self {
            text: text.to_string(),
            compound: 0.0,
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
            polarity: Polarity::Neutral,
            key_words: Vec::new(),
        }
    }
}

/// Word with its adjusted valence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    pub score: f64,
}

/// Token produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Surface form
    pub original: String,
    /// Normalized form used as a feature
    pub normalized: String,
    /// Position in the text
    pub position: usize,
    /// Token type
    pub token_type: TokenType,
}

/// Token type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Word,
    Number,
    Hashtag,
    Mention,
    Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_score_boundaries() {
        assert_eq!(Polarity::from_score(0.05), Polarity::Positive);
        assert_eq!(Polarity::from_score(0.049), Polarity::Neutral);
        assert_eq!(Polarity::from_score(-0.05), Polarity::Negative);
        assert_eq!(Polarity::from_score(-0.049), Polarity::Neutral);
        assert_eq!(Polarity::from_score(0.0), Polarity::Neutral);
        assert_eq!(Polarity::from_score(1.0), Polarity::Positive);
        assert_eq!(Polarity::from_score(-1.0), Polarity::Negative);
        assert_eq!(Polarity::from_score(f64::NAN), Polarity::Neutral);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Polarity::from_code(0), Some(Polarity::Negative));
        assert_eq!(Polarity::from_code(2), Some(Polarity::Neutral));
        assert_eq!(Polarity::from_code(4), Some(Polarity::Positive));
        assert_eq!(Polarity::from_code(1), None);
        assert_eq!(Polarity::from_code(-4), None);
    }

    #[test]
    fn test_neutral_collapses_to_negative_target() {
        assert_eq!(Polarity::Positive.binary_target(), 1.0);
        assert_eq!(Polarity::Neutral.binary_target(), 0.0);
        assert_eq!(Polarity::Negative.binary_target(), 0.0);
        assert_eq!(Polarity::Neutral.to_binary(), Polarity::Negative);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Polarity::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
    }
}
