//! Configuration management
//!
//! Experiment settings are read from a TOML file. Every section falls back to
//! its defaults, so a partial file (or none at all) is valid.

use crate::error::{Result, SentimentError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input CSV settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    pub has_headers: bool,
    /// Column holding the numeric label code
    pub label_column: usize,
    /// Column holding the tweet text; `None` means the last column
    pub text_column: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/tweets.csv"),
            has_headers: false,
            label_column: 0,
            text_column: None,
        }
    }
}

/// Train/test split settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

/// TF-IDF vectorizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    pub max_features: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub min_token_length: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            min_df: 1,
            max_df: 1.0,
            min_token_length: 2,
        }
    }
}

/// Logistic regression settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tolerance: f64,
    pub l2_penalty: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            learning_rate: 2.0,
            max_iter: 1000,
            tolerance: 1e-7,
            l2_penalty: 1e-4,
        }
    }
}

/// Lexicon source; the built-in table is used when `path` is unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub path: Option<PathBuf>,
}

/// Where trained artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub model_dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub split: SplitConfig,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
    pub lexicon: LexiconConfig,
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create default configuration file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Config::default();
        config.save(path)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let ratio = self.split.test_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(SentimentError::Config(format!(
                "split.test_ratio must be in (0, 1), got {}",
                ratio
            )));
        }
        if self.vectorizer.max_features == 0 {
            return Err(SentimentError::Config(
                "vectorizer.max_features must be positive".to_string(),
            ));
        }
        if !(self.vectorizer.max_df > 0.0 && self.vectorizer.max_df <= 1.0) {
            return Err(SentimentError::Config(format!(
                "vectorizer.max_df must be in (0, 1], got {}",
                self.vectorizer.max_df
            )));
        }
        let lr = self.classifier.learning_rate;
        if !(lr.is_finite() && lr > 0.0) {
            return Err(SentimentError::Config(format!(
                "classifier.learning_rate must be a positive finite number, got {}",
                lr
            )));
        }
        let tol = self.classifier.tolerance;
        if !(tol.is_finite() && tol >= 0.0) {
            return Err(SentimentError::Config(format!(
                "classifier.tolerance must be a non-negative finite number, got {}",
                tol
            )));
        }
        if self.classifier.max_iter == 0 {
            return Err(SentimentError::Config(
                "classifier.max_iter must be positive".to_string(),
            ));
        }
        let l2 = self.classifier.l2_penalty;
        if !(l2.is_finite() && l2 >= 0.0) {
            return Err(SentimentError::Config(format!(
                "classifier.l2_penalty must be a non-negative finite number, got {}",
                l2
            )));
        }
        if matches!(self.data.text_column, Some(col) if col == self.data.label_column) {
            return Err(SentimentError::Config(
                "data.text_column and data.label_column must differ".to_string(),
            ));
        }
        Ok(())
    }
}
