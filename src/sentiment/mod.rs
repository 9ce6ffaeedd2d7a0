//! Lexicon-based sentiment scoring
//!
//! Includes:
//! - Word lexicons (built-in or loaded from a file)
//! - The compound-score heuristic scorer
//! - Batch aggregation

mod lexicon;
mod scorer;

pub use lexicon::{
    GeneralLexicon, LexiconStats, SentimentLexicon, BOOSTER_INCREMENT, DAMPENER_DECREMENT,
};
pub use scorer::{normalize, AggregatedSentiment, LexiconScorer, CAPS_INCREMENT, NEGATION_SCALAR};
