//! # Tweet sentiment
//!
//! Compares two ways of labeling tweet sentiment on a labeled CSV corpus:
//! a rule-based lexicon scorer and a TF-IDF + logistic regression
//! classifier trained on a seeded 80/20 split.
//!
//! ## Modules
//!
//! - `data` - CSV loading and the train/test split
//! - `nlp` - Tokenization and TF-IDF vectorization
//! - `sentiment` - Lexicon and compound scorer
//! - `classifier` - Logistic regression and the text classifier
//! - `metrics` - Classification report, ROC-AUC, log loss
//! - `persistence` - Saving and loading trained artifacts
//! - `interactive` - Score / classify request handlers
//! - `experiment` - The end-to-end training run

pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod experiment;
pub mod interactive;
pub mod metrics;
pub mod models;
pub mod nlp;
pub mod persistence;
pub mod sentiment;

pub use classifier::{LogisticRegression, SentimentClassifier};
pub use config::Config;
pub use error::{Result, SentimentError};
pub use experiment::{Experiment, ExperimentReport};
pub use interactive::SentimentSession;
pub use models::{Polarity, Record, ScoreResult};
pub use sentiment::LexiconScorer;
