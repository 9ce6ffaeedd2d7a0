//! Supervised sentiment classification
//!
//! - Logistic regression over sparse rows
//! - The text pipeline wrapping it with a TF-IDF vectorizer

mod logistic;
mod pipeline;

pub use logistic::{LogisticRegression, LogisticRegressionError, Regularization};
pub use pipeline::{SentimentClassifier, TrainingSummary, DECISION_THRESHOLD};
