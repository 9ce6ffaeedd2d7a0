//! Evaluation metrics

mod classification;

pub use classification::{
    log_loss, roc_auc, AverageMetrics, ClassMetrics, ClassificationReport,
    ClassifierEvaluation, ConfusionMatrix, Evaluator,
};
