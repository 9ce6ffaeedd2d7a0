//! Artifact persistence
//!
//! A trained classifier is stored as two bincode files in the model
//! directory, one for the fitted vectorizer and one for the logistic model.
//! The experiment report is stored next to them as JSON.

use crate::classifier::{LogisticRegression, SentimentClassifier};
use crate::error::{Result, SentimentError};
use crate::nlp::TextVectorizer;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files kept in the model directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKey {
    Vectorizer,
    Classifier,
    Report,
}

impl ArtifactKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKey::Vectorizer => "vectorizer.bin",
            ArtifactKey::Classifier => "classifier.bin",
            ArtifactKey::Report => "report.json",
        }
    }
}

/// Model directory on disk
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: ArtifactKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn exists(&self, key: ArtifactKey) -> bool {
        self.path(key).is_file()
    }

    /// Both halves of a classifier are present
    pub fn has_classifier(&self) -> bool {
        self.exists(ArtifactKey::Vectorizer) && self.exists(ArtifactKey::Classifier)
    }

    pub fn save_classifier(&self, classifier: &SentimentClassifier) -> Result<()> {
        if !classifier.is_fitted() {
            return Err(SentimentError::ModelUnavailable(
                "refusing to save an untrained classifier".to_string(),
            ));
        }
        fs::create_dir_all(&self.dir)?;

        self.write_bincode(ArtifactKey::Vectorizer, classifier.vectorizer())?;
        self.write_bincode(ArtifactKey::Classifier, classifier.model())?;
        info!("Saved classifier artifacts to {}", self.dir.display());
        Ok(())
    }

    /// Load a classifier; missing files mean no model has been trained
    pub fn load_classifier(&self) -> Result<SentimentClassifier> {
        if !self.has_classifier() {
            return Err(SentimentError::ModelUnavailable(format!(
                "no trained model in {}",
                self.dir.display()
            )));
        }

        let vectorizer: TextVectorizer = self.read_bincode(ArtifactKey::Vectorizer)?;
        let model: LogisticRegression = self.read_bincode(ArtifactKey::Classifier)?;

        if model.n_features() != Some(vectorizer.n_features()) {
            return Err(SentimentError::InvalidData(format!(
                "vectorizer has {} features but classifier expects {:?}",
                vectorizer.n_features(),
                model.n_features()
            )));
        }

        debug!("Loaded classifier with {} features", vectorizer.n_features());
        Ok(SentimentClassifier::from_parts(vectorizer, model))
    }

    pub fn save_report<T: Serialize>(&self, report: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut writer = BufWriter::new(File::create(self.path(ArtifactKey::Report))?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_report<T: DeserializeOwned>(&self) -> Result<T> {
        let reader = BufReader::new(File::open(self.path(ArtifactKey::Report))?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_bincode<T: Serialize>(&self, key: ArtifactKey, value: &T) -> Result<()> {
        let mut writer = BufWriter::new(File::create(self.path(key))?);
        bincode::serialize_into(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    fn read_bincode<T: DeserializeOwned>(&self, key: ArtifactKey) -> Result<T> {
        let reader = BufReader::new(File::open(self.path(key))?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierConfig, VectorizerConfig};
    use crate::models::{Polarity, Record};
    use tempfile::tempdir;

    fn trained() -> SentimentClassifier {
        let records: Vec<Record> = (0..8)
            .flat_map(|i| {
                [
                    Record::new(format!("love great {}", i), Polarity::Positive),
                    Record::new(format!("hate awful {}", i), Polarity::Negative),
                ]
            })
            .collect();
        let mut clf =
            SentimentClassifier::new(&VectorizerConfig::default(), &ClassifierConfig::default());
        clf.train(&records).unwrap();
        clf
    }

    #[test]
    fn test_classifier_round_trip() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("models"));
        let clf = trained();

        store.save_classifier(&clf).unwrap();
        assert!(store.has_classifier());

        let loaded = store.load_classifier().unwrap();
        for text in ["love it", "hate it", "", "unknown words"] {
            assert_eq!(
                clf.predict_proba(text).unwrap(),
                loaded.predict_proba(text).unwrap()
            );
        }
    }

    #[test]
    fn test_saved_files_hold_full_payload() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let clf = trained();

        store.save_classifier(&clf).unwrap();

        let expected = bincode::serialized_size(clf.vectorizer()).unwrap();
        let written = fs::metadata(store.path(ArtifactKey::Vectorizer)).unwrap().len();
        assert_eq!(written, expected);

        let expected = bincode::serialized_size(clf.model()).unwrap();
        let written = fs::metadata(store.path(ArtifactKey::Classifier)).unwrap().len();
        assert_eq!(written, expected);
    }

    #[test]
    fn test_empty_vocabulary_round_trip() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let records = vec![
            Record::new("a", Polarity::Positive),
            Record::new("b", Polarity::Negative),
        ];
        let mut clf =
            SentimentClassifier::new(&VectorizerConfig::default(), &ClassifierConfig::default());
        clf.train(&records).unwrap();

        store.save_classifier(&clf).unwrap();
        let loaded = store.load_classifier().unwrap();
        assert_eq!(loaded.vectorizer().n_features(), 0);
        assert_eq!(
            loaded.predict_proba("anything").unwrap(),
            clf.predict_proba("anything").unwrap()
        );
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        assert!(!store.has_classifier());
        assert!(matches!(
            store.load_classifier(),
            Err(SentimentError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_untrained_is_not_saved() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let clf = SentimentClassifier::new(&VectorizerConfig::default(), &ClassifierConfig::default());

        assert!(store.save_classifier(&clf).is_err());
        assert!(!store.exists(ArtifactKey::Vectorizer));
    }

    #[test]
    fn test_report_round_trip() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.save_report(&vec![1.5f64, 2.5]).unwrap();
        let loaded: Vec<f64> = store.load_report().unwrap();
        assert_eq!(loaded, vec![1.5, 2.5]);
    }
}
