//! Text vectorization
//!
//! Turns token lists into sparse numeric rows:
//! - Bag of Words (term counts)
//! - TF-IDF (Term Frequency - Inverse Document Frequency)
//!
//! Both cap the vocabulary at the `max_features` most frequent terms.

use crate::error::{Result, SentimentError};
use crate::nlp::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Sparse row with strictly increasing indices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Build from an index -> value map, dropping zeros
    pub fn from_map(map: BTreeMap<usize, f64>) -> Self {
        let (indices, values) = map.into_iter().filter(|(_, v)| *v != 0.0).unzip();
        Self { indices, values }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense weight vector; out-of-range indices are ignored
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

/// Document-term matrix with sparse rows
#[derive(Debug, Clone, Default)]
pub struct DocumentTermMatrix {
    /// Index -> term
    pub terms: Vec<String>,
    /// One row per document
    pub rows: Vec<SparseVector>,
}

impl DocumentTermMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }
}

/// Common interface of the vectorizers
pub trait Vectorizer {
    /// Learn the vocabulary (and weights) from a tokenized corpus
    fn fit(&mut self, documents: &[Vec<String>]);

    /// Map one tokenized document onto the fitted vocabulary
    fn transform(&self, document: &[String]) -> SparseVector;

    fn fit_transform(&mut self, documents: &[Vec<String>]) -> DocumentTermMatrix;

    /// Term -> column index
    fn vocabulary(&self) -> &HashMap<String, usize>;

    fn n_features(&self) -> usize {
        self.vocabulary().len()
    }
}

/// Bag of Words vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagOfWords {
    /// Term -> index
    vocabulary: HashMap<String, usize>,
    /// Index -> term
    terms: Vec<String>,
    /// Minimum document frequency (absolute)
    min_df: usize,
    /// Maximum document frequency (fraction of documents)
    max_df: f64,
    /// Keep only the N most frequent terms
    max_features: Option<usize>,
}

impl BagOfWords {
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            min_df: 1,
            max_df: 1.0,
            max_features: None,
        }
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl Default for BagOfWords {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for BagOfWords {
    fn fit(&mut self, documents: &[Vec<String>]) {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut term_freq: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let unique_terms: HashSet<&str> = doc.iter().map(|t| t.as_str()).collect();
            for term in unique_terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
            for term in doc {
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len();
        let max_count = (self.max_df * n_docs as f64).ceil() as usize;

        let mut candidates: Vec<(&str, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && *df <= max_count)
            .map(|(term, _)| (term, term_freq.get(term).copied().unwrap_or(0)))
            .collect();

        // Most frequent first, ties alphabetical
        if let Some(limit) = self.max_features {
            candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            candidates.truncate(limit);
        }

        // Column order is alphabetical regardless of the cap
        candidates.sort_by(|a, b| a.0.cmp(b.0));

        self.vocabulary.clear();
        self.terms.clear();

        for (idx, (term, _)) in candidates.into_iter().enumerate() {
            self.vocabulary.insert(term.to_string(), idx);
            self.terms.push(term.to_string());
        }

        debug!(
            documents = n_docs,
            vocabulary = self.terms.len(),
            "bag of words fitted"
        );
    }

    fn transform(&self, document: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();

        for term in document {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        SparseVector::from_map(counts)
    }

    fn fit_transform(&mut self, documents: &[Vec<String>]) -> DocumentTermMatrix {
        self.fit(documents);

        DocumentTermMatrix {
            terms: self.terms.clone(),
            rows: documents.iter().map(|doc| self.transform(doc)).collect(),
        }
    }

    fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }
}

/// TF-IDF vectorizer with smoothed IDF and L2-normalized rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdf {
    bow: BagOfWords,
    /// IDF per column
    idf: Vec<f64>,
    /// Set by `fit`; the vocabulary itself may legitimately be empty
    fitted: bool,
}

impl TfIdf {
    pub fn new() -> Self {
        Self {
            bow: BagOfWords::new(),
            idf: Vec::new(),
            fitted: false,
        }
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.bow = self.bow.with_min_df(min_df);
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.bow = self.bow.with_max_df(max_df);
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.bow = self.bow.with_max_features(max_features);
        self
    }

    fn calculate_idf(&mut self, documents: &[Vec<String>]) {
        // Smoothing: as if one extra document held every term
        let n_docs = documents.len() as f64 + 1.0;
        let mut doc_freq = vec![0usize; self.bow.n_terms()];

        for doc in documents {
            let unique_terms: HashSet<&String> = doc.iter().collect();
            for term in unique_terms {
                if let Some(&idx) = self.bow.vocabulary.get(term) {
                    doc_freq[idx] += 1;
                }
            }
        }

        self.idf = doc_freq
            .into_iter()
            .map(|df| (n_docs / (df as f64 + 1.0)).ln() + 1.0)
            .collect();
    }

    pub fn get_idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn terms(&self) -> &[String] {
        self.bow.terms()
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Top-N terms by IDF (rarest first)
    pub fn top_terms(&self, n: usize) -> Vec<(String, f64)> {
        let mut term_idf: Vec<_> = self
            .bow
            .terms
            .iter()
            .zip(self.idf.iter())
            .map(|(term, idf)| (term.clone(), *idf))
            .collect();

        term_idf.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        term_idf.truncate(n);
        term_idf
    }
}

impl Default for TfIdf {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for TfIdf {
    fn fit(&mut self, documents: &[Vec<String>]) {
        self.bow.fit(documents);
        self.calculate_idf(documents);
        self.fitted = true;
    }

    fn transform(&self, document: &[String]) -> SparseVector {
        let mut row = self.bow.transform(document);

        for (idx, value) in row.indices.iter().zip(row.values.iter_mut()) {
            *value *= self.idf[*idx];
        }

        let norm = row.norm();
        if norm > 0.0 {
            for value in row.values.iter_mut() {
                *value /= norm;
            }
        }

        row
    }

    fn fit_transform(&mut self, documents: &[Vec<String>]) -> DocumentTermMatrix {
        self.fit(documents);

        DocumentTermMatrix {
            terms: self.bow.terms.clone(),
            rows: documents.iter().map(|doc| self.transform(doc)).collect(),
        }
    }

    fn vocabulary(&self) -> &HashMap<String, usize> {
        self.bow.vocabulary()
    }
}

/// Raw text -> TF-IDF row, with the tokenizer stored alongside the vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextVectorizer {
    tokenizer: Tokenizer,
    tfidf: TfIdf,
}

impl TextVectorizer {
    pub fn new(tokenizer: Tokenizer, tfidf: TfIdf) -> Self {
        Self { tokenizer, tfidf }
    }

    /// Fit on raw texts and return the training rows
    pub fn fit_transform<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<DocumentTermMatrix> {
        if texts.is_empty() {
            return Err(SentimentError::EmptyDataset(
                "cannot fit a vectorizer on zero documents".to_string(),
            ));
        }
        let documents = self.tokenizer.tokenize_batch(texts);
        Ok(self.tfidf.fit_transform(&documents))
    }

    /// Transform one text; terms outside the vocabulary are ignored
    pub fn transform(&self, text: &str) -> Result<SparseVector> {
        if !self.tfidf.is_fitted() {
            return Err(SentimentError::ModelUnavailable(
                "vectorizer has not been fitted".to_string(),
            ));
        }
        let tokens = self.tokenizer.tokenize_to_strings(text);
        Ok(self.tfidf.transform(&tokens))
    }

    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SparseVector>> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    pub fn n_features(&self) -> usize {
        self.tfidf.n_features()
    }

    pub fn terms(&self) -> &[String] {
        self.tfidf.terms()
    }

    pub fn tfidf(&self) -> &TfIdf {
        &self.tfidf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_bag_of_words_counts() {
        let documents = docs(&[&["good", "good", "day"], &["bad", "day"]]);

        let mut bow = BagOfWords::new();
        let dtm = bow.fit_transform(&documents);

        assert_eq!(dtm.n_documents(), 2);
        assert_eq!(dtm.terms, vec!["bad", "day", "good"]);

        let first = &dtm.rows[0];
        assert_eq!(first.indices, vec![1, 2]);
        assert_eq!(first.values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let documents = docs(&[
            &["common", "common", "rare"],
            &["common", "medium", "medium"],
            &["medium", "other"],
        ]);

        let mut bow = BagOfWords::new().with_max_features(Some(2));
        bow.fit(&documents);

        assert_eq!(bow.n_terms(), 2);
        assert!(bow.vocabulary().contains_key("common"));
        assert!(bow.vocabulary().contains_key("medium"));
        assert!(!bow.vocabulary().contains_key("rare"));
    }

    #[test]
    fn test_max_features_tie_break_is_alphabetical() {
        let documents = docs(&[&["zeta", "alpha", "mid"]]);

        let mut bow = BagOfWords::new().with_max_features(Some(2));
        bow.fit(&documents);

        assert_eq!(bow.terms(), &["alpha".to_string(), "mid".to_string()]);
    }

    #[test]
    fn test_tfidf_rows_are_unit_length() {
        let documents = docs(&[&["btc", "moon"], &["btc", "crash"], &["eth", "moon"]]);

        let mut tfidf = TfIdf::new();
        let dtm = tfidf.fit_transform(&documents);

        for row in &dtm.rows {
            assert!((row.norm() - 1.0).abs() < 1e-10);
        }

        // rarer terms weigh more
        let idf = tfidf.get_idf();
        let crash = tfidf.vocabulary()["crash"];
        let btc = tfidf.vocabulary()["btc"];
        assert!(idf[crash] > idf[btc]);
    }

    #[test]
    fn test_smoothed_idf_value() {
        let documents = docs(&[&["a1"], &["a1", "b2"]]);
        let mut tfidf = TfIdf::new();
        tfidf.fit(&documents);

        let b2 = tfidf.vocabulary()["b2"];
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((tfidf.get_idf()[b2] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_terms_ignored() {
        let documents = docs(&[&["happy", "day"], &["sad", "day"]]);
        let mut tfidf = TfIdf::new();
        tfidf.fit(&documents);

        let row = tfidf.transform(&["unknown".to_string(), "words".to_string()]);
        assert!(row.is_empty());

        let mixed = tfidf.transform(&["happy".to_string(), "unknown".to_string()]);
        assert_eq!(mixed.nnz(), 1);
    }

    #[test]
    fn test_text_vectorizer_is_deterministic() {
        let mut vectorizer = TextVectorizer::new(Tokenizer::new(), TfIdf::new());
        vectorizer
            .fit_transform(&["I love sunny days", "rainy days are sad", "love it"])
            .unwrap();

        let a = vectorizer.transform("love the sunny rain").unwrap();
        let b = vectorizer.transform("love the sunny rain").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_vectorizer_requires_fit() {
        let vectorizer = TextVectorizer::new(Tokenizer::new(), TfIdf::new());
        assert!(matches!(
            vectorizer.transform("anything"),
            Err(SentimentError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_empty_vocabulary_still_fitted() {
        let mut vectorizer = TextVectorizer::new(Tokenizer::new(), TfIdf::new());
        let dtm = vectorizer.fit_transform(&["a", "", "b !"]).unwrap();

        assert_eq!(dtm.n_terms(), 0);
        assert!(vectorizer.tfidf().is_fitted());

        let row = vectorizer.transform("love it").unwrap();
        assert!(row.is_empty());
    }

    #[test]
    fn test_sparse_dot() {
        let row = SparseVector {
            indices: vec![0, 2],
            values: vec![0.5, 2.0],
        };
        assert!((row.dot(&[2.0, 10.0, 1.0]) - 3.0).abs() < 1e-12);
        assert!((row.dot(&[2.0]) - 1.0).abs() < 1e-12);
    }
}
