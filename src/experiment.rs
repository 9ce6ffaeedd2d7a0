//! End-to-end experiment
//!
//! Load the CSV, evaluate the lexicon scorer on every kept record, split,
//! train the TF-IDF classifier on the training part, evaluate it on the test
//! part and persist the artifacts together with a JSON report.

use crate::classifier::{SentimentClassifier, TrainingSummary};
use crate::config::Config;
use crate::data::{train_test_split, DataLoader, LoadReport};
use crate::error::{Result, SentimentError};
use crate::metrics::{ClassificationReport, ClassifierEvaluation, Evaluator};
use crate::models::{Polarity, Record};
use crate::persistence::ArtifactStore;
use crate::sentiment::{AggregatedSentiment, LexiconScorer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Lexicon scorer measured against the three-way labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEvaluation {
    pub load: LoadReport,
    pub report: ClassificationReport,
    pub summary: AggregatedSentiment,
}

/// Everything one training run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub trained_at: DateTime<Utc>,
    pub data_path: PathBuf,
    pub load: LoadReport,
    pub lexicon: ClassificationReport,
    pub train_size: usize,
    pub test_size: usize,
    pub training: TrainingSummary,
    pub classifier: ClassifierEvaluation,
    pub top_positive_terms: Vec<(String, f64)>,
    pub top_negative_terms: Vec<(String, f64)>,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Experiment ({})", self.trained_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "==============================\n")?;
        writeln!(
            f,
            "Data: {} ({} of {} rows kept)",
            self.data_path.display(),
            self.load.kept,
            self.load.total_rows
        )?;
        writeln!(
            f,
            "Split: {} train / {} test, vocabulary {}\n",
            self.train_size, self.test_size, self.training.n_features
        )?;

        writeln!(f, "Lexicon scorer (all records)")?;
        writeln!(f, "----------------------------")?;
        writeln!(f, "{}", self.lexicon)?;

        writeln!(f, "TF-IDF + logistic regression (test split)")?;
        writeln!(f, "-----------------------------------------")?;
        writeln!(f, "{}", self.classifier)?;

        let terms = |list: &[(String, f64)]| {
            list.iter()
                .map(|(t, c)| format!("{} ({:+.3})", t, c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "Top positive terms: {}", terms(&self.top_positive_terms))?;
        write!(f, "Top negative terms: {}", terms(&self.top_negative_terms))
    }
}

/// Experiment driver
pub struct Experiment;

impl Experiment {
    /// Train, evaluate and persist
    pub fn run(config: &Config) -> Result<ExperimentReport> {
        config.validate()?;

        let dataset = DataLoader::load_records(&config.data.path, &config.data)?;
        let records = require_records(dataset.records)?;

        let scorer = LexiconScorer::from_config(&config.lexicon)?;
        let lexicon = evaluate_lexicon(&scorer, &records)?;
        info!("Lexicon accuracy: {:.4}", lexicon.accuracy);

        let (train, test) = train_test_split(&records, config.split.test_ratio, config.split.seed)?;
        info!("Split {} records into {} train / {} test", records.len(), train.len(), test.len());

        let mut classifier = SentimentClassifier::new(&config.vectorizer, &config.classifier);
        let training = classifier.train(&train)?;
        let evaluation = classifier.evaluate(&test)?;
        info!(
            "Classifier accuracy: {:.4}, ROC-AUC: {:.4}",
            evaluation.report.accuracy, evaluation.roc_auc
        );

        let (top_positive_terms, top_negative_terms) = classifier.top_terms(10)?;

        let report = ExperimentReport {
            trained_at: Utc::now(),
            data_path: config.data.path.clone(),
            load: dataset.report,
            lexicon,
            train_size: train.len(),
            test_size: test.len(),
            training,
            classifier: evaluation,
            top_positive_terms,
            top_negative_terms,
        };

        let store = ArtifactStore::new(&config.artifacts.model_dir);
        store.save_classifier(&classifier)?;
        store.save_report(&report)?;

        Ok(report)
    }

    /// Score every record with the lexicon and compare with the true labels.
    /// When `export` is set, the per-row predictions are written there as CSV.
    pub fn lexicon(config: &Config, export: Option<&Path>) -> Result<LexiconEvaluation> {
        let dataset = DataLoader::load_records(&config.data.path, &config.data)?;
        let load = dataset.report;
        let records = require_records(dataset.records)?;

        let scorer = LexiconScorer::from_config(&config.lexicon)?;
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let scores = scorer.score_batch(&texts);

        let y_true: Vec<Polarity> = records.iter().map(|r| r.label).collect();
        let y_pred: Vec<Polarity> = scores.iter().map(|s| s.polarity).collect();
        let report = Evaluator::evaluate(&y_true, &y_pred)?;

        if let Some(path) = export {
            DataLoader::save_scored(&records, &scores, path)?;
            info!("Wrote lexicon predictions to {}", path.display());
        }

        Ok(LexiconEvaluation {
            load,
            report,
            summary: scorer.aggregate(&scores),
        })
    }
}

fn require_records(records: Vec<Record>) -> Result<Vec<Record>> {
    if records.is_empty() {
        return Err(SentimentError::EmptyDataset(
            "no usable records after loading".to_string(),
        ));
    }
    Ok(records)
}

fn evaluate_lexicon(scorer: &LexiconScorer, records: &[Record]) -> Result<ClassificationReport> {
    let y_true: Vec<Polarity> = records.iter().map(|r| r.label).collect();
    let y_pred: Vec<Polarity> = records.iter().map(|r| scorer.label(&r.text)).collect();
    Evaluator::evaluate(&y_true, &y_pred)
}
