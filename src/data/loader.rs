//! Data loading and saving utilities
//!
//! Reads labeled tweets from CSV. Rows whose label code is not one of
//! 0 / 2 / 4, or that lack a label or text column, are dropped and counted.

use crate::config::DataConfig;
use crate::error::{Result, SentimentError};
use crate::models::{Polarity, Record, ScoreResult};
use csv::{ByteRecord, ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Bookkeeping for one load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept: usize,
    /// Rows with a label code outside 0 / 2 / 4 (or not a number)
    pub unmapped_labels: usize,
    /// Rows missing the label or text column, or unreadable
    pub malformed_rows: usize,
    pub label_counts: BTreeMap<Polarity, usize>,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.unmapped_labels + self.malformed_rows
    }
}

/// Records plus the report describing how they were read
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<Record>,
    pub report: LoadReport,
}

/// One lexicon prediction row for export
#[derive(Debug, Clone, Serialize)]
struct ScoredRow<'a> {
    text: &'a str,
    true_label: Polarity,
    lexicon_label: Polarity,
    compound: f64,
}

/// Data loader for CSV files
pub struct DataLoader;

impl DataLoader {
    /// Load labeled records from a CSV file
    pub fn load_records<P: AsRef<Path>>(path: P, config: &DataConfig) -> Result<LoadedDataset> {
        let file = File::open(&path).map_err(|e| {
            SentimentError::InvalidData(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let dataset = Self::load_from_reader(file, config)?;
        info!(
            "Loaded {} of {} rows from {}",
            dataset.report.kept,
            dataset.report.total_rows,
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Load labeled records from any reader
    pub fn load_from_reader<R: Read>(reader: R, config: &DataConfig) -> Result<LoadedDataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(config.has_headers)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut report = LoadReport::default();
        let mut row = ByteRecord::new();

        loop {
            match reader.read_byte_record(&mut row) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    report.total_rows += 1;
                    report.malformed_rows += 1;
                    warn!("Skipping unreadable row: {}", e);
                    // I/O errors are fatal
                    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                        return Err(e.into());
                    }
                    continue;
                }
            }
            report.total_rows += 1;

            match Self::parse_row(&row, config) {
                RowOutcome::Kept(record) => {
                    *report.label_counts.entry(record.label).or_insert(0) += 1;
                    records.push(record);
                }
                RowOutcome::Unmapped => report.unmapped_labels += 1,
                RowOutcome::Malformed => report.malformed_rows += 1,
            }
        }

        report.kept = records.len();
        if report.dropped() > 0 {
            warn!(
                "Dropped {} rows ({} unmapped labels, {} malformed)",
                report.dropped(),
                report.unmapped_labels,
                report.malformed_rows
            );
        }

        Ok(LoadedDataset { records, report })
    }

    fn parse_row(row: &ByteRecord, config: &DataConfig) -> RowOutcome {
        let text_column = match config.text_column {
            Some(col) => col,
            None if row.len() >= 2 => row.len() - 1,
            None => return RowOutcome::Malformed,
        };

        let (Some(label_raw), Some(text_raw)) = (row.get(config.label_column), row.get(text_column))
        else {
            return RowOutcome::Malformed;
        };

        let label = String::from_utf8_lossy(label_raw)
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(Polarity::from_code);

        match label {
            Some(label) => RowOutcome::Kept(Record::new(String::from_utf8_lossy(text_raw), label)),
            None => RowOutcome::Unmapped,
        }
    }

    /// Save lexicon predictions next to their true labels
    pub fn save_scored<P: AsRef<Path>>(
        records: &[Record],
        scores: &[ScoreResult],
        path: P,
    ) -> Result<()> {
        if records.len() != scores.len() {
            return Err(SentimentError::LengthMismatch {
                expected: records.len(),
                got: scores.len(),
            });
        }

        let mut writer = Writer::from_path(&path)?;
        for (record, score) in records.iter().zip(scores.iter()) {
            writer.serialize(ScoredRow {
                text: &record.text,
                true_label: record.label,
                lexicon_label: score.polarity,
                compound: score.compound,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

enum RowOutcome {
    Kept(Record),
    Unmapped,
    Malformed,
}
