//! Lexicon-based sentiment scorer
//!
//! Sums word valences with a few heuristics (capitalization, boosters,
//! negation, contrastive "but", trailing punctuation) and squashes the sum
//! into a compound score in [-1, 1].

use crate::config::LexiconConfig;
use crate::error::Result;
use crate::models::{Polarity, ScoreResult, ScoredWord};
use crate::sentiment::lexicon::{GeneralLexicon, SentimentLexicon};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Emphasis added to an ALL-CAPS word in mixed-case text
pub const CAPS_INCREMENT: f64 = 0.733;

/// Valence multiplier applied after a negation
pub const NEGATION_SCALAR: f64 = -0.74;

/// Normalization constant of the compound score
pub const NORMALIZATION_ALPHA: f64 = 15.0;

/// How many preceding tokens may boost or negate a word
const LOOKBACK: usize = 3;

/// Booster decay by distance (1, 2, 3 tokens back)
const BOOSTER_DECAY: [f64; LOOKBACK] = [1.0, 0.95, 0.9];

const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;

/// Squash a raw valence sum into [-1, 1]
///
/// Computes `score / sqrt(score² + alpha)` with the square factored out of
/// the root so very large sums saturate at ±1 instead of overflowing.
pub fn normalize(score: f64) -> f64 {
    if score == 0.0 || score.is_nan() {
        return 0.0;
    }
    if score.is_infinite() {
        return score.signum();
    }
    let norm = score / (score.abs() * (1.0 + NORMALIZATION_ALPHA / (score * score)).sqrt());
    norm.clamp(-1.0, 1.0)
}

/// Lexicon-based scorer
#[derive(Debug, Clone)]
pub struct LexiconScorer<L = GeneralLexicon> {
    lexicon: L,
}

impl LexiconScorer<GeneralLexicon> {
    /// Scorer backed by the built-in lexicon
    pub fn new() -> Self {
        Self {
            lexicon: GeneralLexicon::new(),
        }
    }

    /// Scorer backed by the configured lexicon file, or the built-in one
    pub fn from_config(config: &LexiconConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Ok(Self::with_lexicon(GeneralLexicon::from_file(path)?)),
            None => Ok(Self::new()),
        }
    }
}

impl Default for LexiconScorer<GeneralLexicon> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SentimentLexicon> LexiconScorer<L> {
    pub fn with_lexicon(lexicon: L) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    /// Score a text. Empty or whitespace-only input is neutral.
    pub fn score(&self, text: &str) -> ScoreResult {
        if text.trim().is_empty() {
            return ScoreResult::neutral(text);
        }

        let words = self.words_and_emoticons(text);
        if words.is_empty() {
            return ScoreResult::neutral(text);
        }

        let caps_differential = has_caps_differential(&words);
        let mut sentiments: Vec<f64> = words
            .iter()
            .enumerate()
            .map(|(i, _)| self.word_valence(&words, i, caps_differential))
            .collect();

        apply_but_rule(&words, &mut sentiments);

        let key_words = words
            .iter()
            .zip(sentiments.iter())
            .filter(|(_, s)| **s != 0.0)
            .map(|(w, s)| ScoredWord {
                word: w.clone(),
                score: *s,
            })
            .collect();

        let punctuation = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += punctuation;
        } else if sum < 0.0 {
            sum -= punctuation;
        }
        let compound = normalize(sum);

        let (positive, neutral, negative) = sentiment_shares(&sentiments, punctuation);

        ScoreResult {
            text: text.to_string(),
            compound,
            positive,
            neutral,
            negative,
            polarity: Polarity::from_score(compound),
            key_words,
        }
    }

    /// Score several texts
    pub fn score_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<ScoreResult> {
        texts.iter().map(|t| self.score(t.as_ref())).collect()
    }

    /// Label only
    pub fn label(&self, text: &str) -> Polarity {
        self.score(text).polarity
    }

    /// Summarize a batch of results
    pub fn aggregate(&self, results: &[ScoreResult]) -> AggregatedSentiment {
        if results.is_empty() {
            return AggregatedSentiment::default();
        }

        let average_compound =
            results.iter().map(|r| r.compound).sum::<f64>() / results.len() as f64;

        let count = |p: Polarity| results.iter().filter(|r| r.polarity == p).count();

        let mut all_words: HashMap<String, f64> = HashMap::new();
        for result in results {
            for word in &result.key_words {
                *all_words.entry(word.word.to_lowercase()).or_insert(0.0) += word.score;
            }
        }

        let mut top_keywords: Vec<_> = all_words.into_iter().collect();
        top_keywords.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0)));
        top_keywords.truncate(10);

        AggregatedSentiment {
            average_compound,
            total_count: results.len(),
            positive_count: count(Polarity::Positive),
            negative_count: count(Polarity::Negative),
            neutral_count: count(Polarity::Neutral),
            top_keywords,
            overall_polarity: Polarity::from_score(average_compound),
        }
    }

    /// Whitespace tokens with edge punctuation stripped. Emoticons known to
    /// the lexicon are kept verbatim; single-character words are dropped.
    fn words_and_emoticons(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|raw| {
                if self.lexicon.contains(raw) {
                    return Some(raw.to_string());
                }
                let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\'');
                let stripped = stripped.trim_matches('\'');
                if stripped.chars().count() <= 1 {
                    None
                } else {
                    Some(stripped.to_string())
                }
            })
            .collect()
    }

    fn word_valence(&self, words: &[String], i: usize, caps_differential: bool) -> f64 {
        let word = &words[i];

        if self.lexicon.get_booster(word).is_some() || self.lexicon.is_negation(word) {
            return 0.0;
        }

        let Some(mut valence) = self.lexicon.get_score(word) else {
            return 0.0;
        };

        if caps_differential && is_all_caps(word) {
            valence += CAPS_INCREMENT * valence.signum();
        }

        let mut negated = false;
        for distance in 1..=LOOKBACK.min(i) {
            let previous = &words[i - distance];

            if let Some(mut scalar) = self.lexicon.get_booster(previous) {
                if valence < 0.0 {
                    scalar = -scalar;
                }
                if caps_differential && is_all_caps(previous) {
                    scalar += CAPS_INCREMENT * valence.signum();
                }
                valence += scalar * BOOSTER_DECAY[distance - 1];
            }

            if self.lexicon.is_negation(previous) {
                negated = true;
            }
        }

        if negated {
            valence *= NEGATION_SCALAR;
        }

        valence
    }
}

/// Aggregated lexicon results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSentiment {
    pub average_compound: f64,
    pub total_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// Words with the largest summed valence
    pub top_keywords: Vec<(String, f64)>,
    pub overall_polarity: Polarity,
}

impl Default for AggregatedSentiment {
    fn default() -> Self {
        Self {
            average_compound: 0.0,
            total_count: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            top_keywords: Vec::new(),
            overall_polarity: Polarity::Neutral,
        }
    }
}

impl fmt::Display for AggregatedSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Overall: {} (mean compound: {:.3})\n\
             Scored: {} texts ({} positive, {} negative, {} neutral)",
            self.overall_polarity,
            self.average_compound,
            self.total_count,
            self.positive_count,
            self.negative_count,
            self.neutral_count
        )
    }
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(|c| c.is_alphabetic()) && !word.chars().any(|c| c.is_lowercase())
}

/// True when some, but not all, words are ALL CAPS
fn has_caps_differential(words: &[String]) -> bool {
    let caps = words.iter().filter(|w| is_all_caps(w)).count();
    caps > 0 && caps < words.len()
}

/// Halve everything before the first "but", boost everything after it
fn apply_but_rule(words: &[String], sentiments: &mut [f64]) {
    let Some(but_idx) = words.iter().position(|w| w.eq_ignore_ascii_case("but")) else {
        return;
    };

    for (i, sentiment) in sentiments.iter_mut().enumerate() {
        if i < but_idx {
            *sentiment *= 0.5;
        } else if i > but_idx {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let exclamation_amp = exclamations as f64 * EXCLAMATION_INCREMENT;

    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCREMENT,
        _ => QUESTION_CAP,
    };

    exclamation_amp + question_amp
}

/// Positive / neutral / negative shares of the sentiment mass
fn sentiment_shares(sentiments: &[f64], punctuation: f64) -> (f64, f64, f64) {
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0usize;

    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += punctuation;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punctuation;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f64;
    if total == 0.0 {
        return (0.0, 1.0, 0.0);
    }

    (
        pos_sum / total,
        neu_count as f64 / total,
        neg_sum.abs() / total,
    )
}
