//! Data model

mod types;

pub use types::{
    Polarity, Record, ScoreResult, ScoredWord, Token, TokenType, NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD,
};
