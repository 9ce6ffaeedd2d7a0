//! Crate-wide error type

use crate::classifier::LogisticRegressionError;
use thiserror::Error;

/// Errors produced by the sentiment pipeline
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Model(#[from] LogisticRegressionError),
}

impl From<bincode::Error> for SentimentError {
    fn from(err: bincode::Error) -> Self {
        SentimentError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SentimentError {
    fn from(err: toml::de::Error) -> Self {
        SentimentError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SentimentError {
    fn from(err: toml::ser::Error) -> Self {
        SentimentError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
