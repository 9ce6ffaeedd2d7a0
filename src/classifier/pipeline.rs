//! Text classifier: TF-IDF features feeding a logistic regression.
//!
//! The model is binary. `Positive` maps to 1; `Neutral` and `Negative` both
//! map to 0, so predictions are only ever `Positive` or `Negative`.

use super::logistic::{LogisticRegression, Regularization};
use crate::config::{ClassifierConfig, VectorizerConfig};
use crate::error::Result;
use crate::metrics::{ClassifierEvaluation, Evaluator};
use crate::models::{Polarity, Record};
use crate::nlp::{TextVectorizer, TfIdf, Tokenizer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Probability at or above which a text is labeled positive
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub n_documents: usize,
    pub n_features: usize,
    /// Share of training rows with target 1
    pub positive_share: f64,
    pub iterations: usize,
    pub final_cost: f64,
}

/// Fitted (or fittable) text classifier
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    vectorizer: TextVectorizer,
    model: LogisticRegression,
}

impl SentimentClassifier {
    /// Build an untrained classifier from config sections
    pub fn new(vectorizer: &VectorizerConfig, classifier: &ClassifierConfig) -> Self {
        let tokenizer = Tokenizer::new().with_min_length(vectorizer.min_token_length);
        let tfidf = TfIdf::new()
            .with_min_df(vectorizer.min_df)
            .with_max_df(vectorizer.max_df)
            .with_max_features(Some(vectorizer.max_features));

        let model = LogisticRegression::new(
            classifier.learning_rate,
            classifier.max_iter,
            classifier.tolerance,
            true,
            Regularization::L2(classifier.l2_penalty),
        );

        Self {
            vectorizer: TextVectorizer::new(tokenizer, tfidf),
            model,
        }
    }

    /// Reassemble from persisted parts
    pub fn from_parts(vectorizer: TextVectorizer, model: LogisticRegression) -> Self {
        Self { vectorizer, model }
    }

    pub fn into_parts(self) -> (TextVectorizer, LogisticRegression) {
        (self.vectorizer, self.model)
    }

    pub fn vectorizer(&self) -> &TextVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    /// Fit the vocabulary and the model on labeled records
    pub fn train(&mut self, records: &[Record]) -> Result<TrainingSummary> {
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let targets: Vec<f64> = records.iter().map(|r| r.label.binary_target()).collect();

        let dtm = self.vectorizer.fit_transform(&texts)?;
        if dtm.n_terms() == 0 {
            warn!("Training texts produced an empty vocabulary; predictions will use the intercept only");
        }
        info!(
            "Vectorized {} documents into {} features",
            dtm.n_documents(),
            dtm.n_terms()
        );

        self.model.fit(&dtm.rows, &targets, dtm.n_terms())?;

        let summary = TrainingSummary {
            n_documents: dtm.n_documents(),
            n_features: dtm.n_terms(),
            positive_share: targets.iter().sum::<f64>() / targets.len() as f64,
            iterations: self.model.cost_history.len(),
            final_cost: self.model.cost_history.last().copied().unwrap_or(f64::NAN),
        };
        debug!(?summary, "Classifier trained");

        Ok(summary)
    }

    /// Probability that `text` is positive
    pub fn predict_proba(&self, text: &str) -> Result<f64> {
        let row = self.vectorizer.transform(text)?;
        Ok(self.model.predict_proba_one(&row)?)
    }

    pub fn predict(&self, text: &str) -> Result<Polarity> {
        Ok(Self::label_for(self.predict_proba(text)?))
    }

    pub fn predict_proba_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<f64>> {
        let rows = self.vectorizer.transform_batch(texts)?;
        Ok(self.model.predict_proba(&rows)?.to_vec())
    }

    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Polarity>> {
        Ok(self
            .predict_proba_batch(texts)?
            .into_iter()
            .map(Self::label_for)
            .collect())
    }

    /// Evaluate on held-out records against their binary targets
    pub fn evaluate(&self, records: &[Record]) -> Result<ClassifierEvaluation> {
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let y_true: Vec<Polarity> = records.iter().map(|r| r.label.to_binary()).collect();
        let proba = self.predict_proba_batch(&texts)?;
        let y_pred: Vec<Polarity> = proba.iter().copied().map(Self::label_for).collect();

        Evaluator::evaluate_binary(&y_true, &y_pred, &proba)
    }

    /// Most indicative terms for each class
    pub fn top_terms(&self, n: usize) -> Result<(Vec<(String, f64)>, Vec<(String, f64)>)> {
        Ok(self.model.top_coefficients(self.vectorizer.terms(), n)?)
    }

    /// Map a positive-class probability onto the binary label space
    pub fn label_for(p: f64) -> Polarity {
        if p >= DECISION_THRESHOLD {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }
}
