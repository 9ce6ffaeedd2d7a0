//! Classification metrics
//!
//! Pure functions over (true labels, predicted labels): accuracy, per-class
//! precision / recall / F1, macro and weighted averages, confusion matrix.
//! Binary scores additionally get ROC-AUC and log loss.

use crate::error::{Result, SentimentError};
use crate::models::Polarity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Confusion matrix; rows are true labels, columns are predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<Polarity>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build from aligned label slices. Labels seen on either side are
    /// included, in polarity order.
    pub fn from_predictions(y_true: &[Polarity], y_pred: &[Polarity]) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let labels: Vec<Polarity> = Polarity::ALL
            .into_iter()
            .filter(|l| y_true.contains(l) || y_pred.contains(l))
            .collect();

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            if let (Some(row), Some(col)) = (
                labels.iter().position(|l| l == t),
                labels.iter().position(|l| l == p),
            ) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    fn index(&self, label: Polarity) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    /// Count of rows with `truth` that were predicted as `predicted`
    pub fn get(&self, truth: Polarity, predicted: Polarity) -> usize {
        match (self.index(truth), self.index(predicted)) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    fn true_positives(&self, idx: usize) -> usize {
        self.counts[idx][idx]
    }

    fn predicted_count(&self, idx: usize) -> usize {
        self.counts.iter().map(|row| row[idx]).sum()
    }

    fn support(&self, idx: usize) -> usize {
        self.counts[idx].iter().sum()
    }

    pub fn display(&self) -> String {
        let mut s = String::from("Confusion Matrix (rows: actual, columns: predicted):\n\n");
        s.push_str(&format!("{:>12}", ""));
        for label in &self.labels {
            s.push_str(&format!("{:>10}", label.as_str()));
        }
        s.push('\n');
        for (label, row) in self.labels.iter().zip(self.counts.iter()) {
            s.push_str(&format!("{:>12}", label.as_str()));
            for count in row {
                s.push_str(&format!("{:>10}", count));
            }
            s.push('\n');
        }
        s
    }
}

/// Metrics for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: Polarity,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Full evaluation of a label assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub confusion_matrix: ConfusionMatrix,
    pub per_class: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    pub fn get(&self, label: Polarity) -> Option<&ClassMetrics> {
        self.per_class.iter().find(|m| m.label == label)
    }

    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!(
            "{:>12}{:>11}{:>10}{:>10}{:>10}\n",
            "", "precision", "recall", "f1-score", "support"
        ));
        for m in &self.per_class {
            s.push_str(&format!(
                "{:>12}{:>11.4}{:>10.4}{:>10.4}{:>10}\n",
                m.label.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            ));
        }
        s.push('\n');
        s.push_str(&format!(
            "{:>12}{:>11}{:>10}{:>10.4}{:>10}\n",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion_matrix.total()
        ));
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            s.push_str(&format!(
                "{:>12}{:>11.4}{:>10.4}{:>10.4}{:>10}\n",
                name, avg.precision, avg.recall, avg.f1, avg.support
            ));
        }
        s.push('\n');
        s.push_str(&self.confusion_matrix.display());
        s
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Binary classifier evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierEvaluation {
    pub report: ClassificationReport,
    pub roc_auc: f64,
    pub log_loss: f64,
}

impl fmt::Display for ClassifierEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n  ROC-AUC:  {:.4}\n  Log Loss: {:.4}\n",
            self.report, self.roc_auc, self.log_loss
        )
    }
}

/// Stateless evaluator
pub struct Evaluator;

impl Evaluator {
    /// Evaluate predicted labels against the truth
    pub fn evaluate(y_true: &[Polarity], y_pred: &[Polarity]) -> Result<ClassificationReport> {
        if y_true.is_empty() {
            return Err(SentimentError::EmptyDataset(
                "no labels to evaluate".to_string(),
            ));
        }

        let cm = ConfusionMatrix::from_predictions(y_true, y_pred)?;
        let total = cm.total();

        let per_class: Vec<ClassMetrics> = cm
            .labels
            .iter()
            .enumerate()
            .map(|(idx, &label)| {
                let tp = cm.true_positives(idx);
                let precision = safe_div(tp, cm.predicted_count(idx));
                let recall = safe_div(tp, cm.support(idx));
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1: f1_score(precision, recall),
                    support: cm.support(idx),
                }
            })
            .collect();

        let n_classes = per_class.len() as f64;
        let macro_avg = AverageMetrics {
            precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n_classes,
            recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n_classes,
            f1: per_class.iter().map(|m| m.f1).sum::<f64>() / n_classes,
            support: total,
        };

        let weighted = |f: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                return 0.0;
            }
            per_class
                .iter()
                .map(|m| f(m) * m.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Ok(ClassificationReport {
            accuracy: safe_div(cm.correct(), total),
            confusion_matrix: cm,
            per_class,
            macro_avg,
            weighted_avg,
        })
    }

    /// Evaluate a binary classifier from labels and positive-class scores
    pub fn evaluate_binary(
        y_true: &[Polarity],
        y_pred: &[Polarity],
        y_proba: &[f64],
    ) -> Result<ClassifierEvaluation> {
        check_lengths(y_true.len(), y_proba.len())?;

        let report = Self::evaluate(y_true, y_pred)?;
        let positives: Vec<bool> = y_true.iter().map(|l| *l == Polarity::Positive).collect();

        Ok(ClassifierEvaluation {
            report,
            roc_auc: roc_auc(&positives, y_proba),
            log_loss: log_loss(&positives, y_proba),
        })
    }
}

fn check_lengths(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(SentimentError::LengthMismatch { expected, got });
    }
    Ok(())
}

fn safe_div(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    let denom = precision + recall;
    if denom < 1e-12 {
        0.0
    } else {
        2.0 * precision * recall / denom
    }
}

/// Area under the ROC curve (trapezoid rule over tied-score groups).
///
/// Returns 0.5 when only one class is present. NaN scores form their own
/// tie group.
pub fn roc_auc(y_true: &[bool], scores: &[f64]) -> f64 {
    let mut pairs: Vec<(f64, bool)> = scores.iter().copied().zip(y_true.iter().copied()).collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let n_pos = pairs.iter().filter(|(_, t)| *t).count() as f64;
    let n_neg = pairs.len() as f64 - n_pos;
    if n_pos == 0.0 || n_neg == 0.0 {
        return 0.5;
    }

    let mut auc = 0.0;
    let (mut tp, mut fp) = (0.0, 0.0);
    let (mut tpr_prev, mut fpr_prev) = (0.0, 0.0);

    let mut i = 0;
    while i < pairs.len() {
        let score = pairs[i].0;
        let mut j = i;
        while j < pairs.len() && pairs[j].0.total_cmp(&score) == Ordering::Equal {
            if pairs[j].1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            j += 1;
        }

        let tpr = tp / n_pos;
        let fpr = fp / n_neg;
        auc += (fpr - fpr_prev) * (tpr + tpr_prev) / 2.0;

        tpr_prev = tpr;
        fpr_prev = fpr;
        i = j;
    }

    auc
}

/// Binary cross-entropy of positive-class probabilities
pub fn log_loss(y_true: &[bool], y_proba: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let eps = 1e-15;

    -y_true
        .iter()
        .zip(y_proba.iter())
        .map(|(&t, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            if t {
                p.ln()
            } else {
                (1.0 - p).ln()
            }
        })
        .sum::<f64>()
        / y_true.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use Polarity::{Negative as N, Neutral as U, Positive as P};

    #[test]
    fn test_confusion_matrix() {
        let y_true = [P, N, P, P, N, N];
        let y_pred = [P, N, N, P, P, N];

        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();

        assert_eq!(cm.labels, vec![N, P]);
        assert_eq!(cm.get(P, P), 2);
        assert_eq!(cm.get(N, N), 2);
        assert_eq!(cm.get(N, P), 1);
        assert_eq!(cm.get(P, N), 1);
        assert_eq!(cm.get(U, U), 0);
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn test_binary_scores() {
        let y_true = [P, N, P, P, N, N];
        let y_pred = [P, N, N, P, P, N];

        let report = Evaluator::evaluate(&y_true, &y_pred).unwrap();
        let positive = report.get(P).unwrap();

        // Precision = 2/3, Recall = 2/3, F1 = 2/3
        assert!((positive.precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((positive.recall - 2.0 / 3.0).abs() < 1e-10);
        assert!((positive.f1 - 2.0 / 3.0).abs() < 1e-10);
        assert!((report.accuracy - 4.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_three_class_report() {
        let y_true = [N, N, U, U, P, P];
        let y_pred = [N, U, U, U, P, N];

        let report = Evaluator::evaluate(&y_true, &y_pred).unwrap();

        assert_eq!(report.per_class.len(), 3);
        assert!((report.accuracy - 4.0 / 6.0).abs() < 1e-10);

        let neutral = report.get(U).unwrap();
        assert!((neutral.precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((neutral.recall - 1.0).abs() < 1e-10);
        assert_eq!(neutral.support, 2);

        let negative = report.get(N).unwrap();
        assert!((negative.precision - 0.5).abs() < 1e-10);
        assert!((negative.recall - 0.5).abs() < 1e-10);

        assert_eq!(report.macro_avg.support, 6);
        assert!(report.report().contains("weighted avg"));
    }

    #[test]
    fn test_zero_division_is_zero() {
        let y_true = [P, P];
        let y_pred = [N, N];

        let report = Evaluator::evaluate(&y_true, &y_pred).unwrap();
        let negative = report.get(N).unwrap();

        assert_eq!(negative.precision, 0.0);
        assert_eq!(negative.recall, 0.0);
        assert_eq!(negative.f1, 0.0);
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            Evaluator::evaluate(&[P, N], &[P]),
            Err(SentimentError::LengthMismatch { expected: 2, got: 1 })
        ));
        assert!(Evaluator::evaluate(&[], &[]).is_err());
    }

    #[test]
    fn test_auc_perfect() {
        let y_true = [false, false, true, true];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert!((roc_auc(&y_true, &scores) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_auc_with_ties() {
        let y_true = [false, true, false, true];
        let scores = [0.5, 0.5, 0.5, 0.5];
        assert!((roc_auc(&y_true, &scores) - 0.5).abs() < 1e-10);

        assert_eq!(roc_auc(&[true, true], &[0.1, 0.9]), 0.5);
    }

    #[test]
    fn test_log_loss() {
        let y_true = [true, false];
        let confident = log_loss(&y_true, &[0.99, 0.01]);
        let unsure = log_loss(&y_true, &[0.5, 0.5]);
        assert!(confident < unsure);
        assert!((unsure - 2f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_auc_with_nan_score_terminates() {
        let y_true = [true, false, true];
        let scores = [0.9, f64::NAN, 0.2];

        let auc = roc_auc(&y_true, &scores);
        assert!(auc.is_finite());
        assert!((0.0..=1.0).contains(&auc));
    }

    #[test]
    fn test_evaluate_binary() {
        let y_true = [N, N, P, P];
        let y_pred = [N, N, P, P];
        let proba = [0.1, 0.3, 0.7, 0.9];

        let eval = Evaluator::evaluate_binary(&y_true, &y_pred, &proba).unwrap();
        assert_eq!(eval.report.accuracy, 1.0);
        assert!((eval.roc_auc - 1.0).abs() < 1e-10);
    }
}
