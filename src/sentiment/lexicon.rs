//! Sentiment lexicons
//!
//! The scorer only needs word valences, booster words and negations, so the
//! word list sits behind the [`SentimentLexicon`] trait. [`GeneralLexicon`]
//! ships a built-in English table on the usual `[-4, 4]` valence scale and
//! can be replaced wholesale by a lexicon file.

use crate::error::{Result, SentimentError};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Intensity added by a booster word
pub const BOOSTER_INCREMENT: f64 = 0.293;

/// Intensity removed by a dampener word
pub const DAMPENER_DECREMENT: f64 = -0.293;

/// Word lookup used by the scorer
pub trait SentimentLexicon {
    /// Valence of a word, `None` when the word carries no sentiment
    fn get_score(&self, word: &str) -> Option<f64>;

    /// Intensity shift of a booster / dampener word
    fn get_booster(&self, word: &str) -> Option<f64>;

    fn is_negation(&self, word: &str) -> bool;

    fn contains(&self, word: &str) -> bool {
        self.get_score(word).is_some()
    }
}

/// General-purpose English lexicon
#[derive(Debug, Clone)]
pub struct GeneralLexicon {
    valences: HashMap<String, f64>,
    boosters: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl GeneralLexicon {
    /// Lexicon with the built-in valence table
    pub fn new() -> Self {
        let valences = BUILTIN_VALENCES
            .iter()
            .map(|(word, score)| (word.to_string(), *score))
            .collect();

        Self {
            valences,
            boosters: default_boosters(),
            negations: default_negations(),
        }
    }

    /// Load valences from a tab-separated file (`token<TAB>mean[<TAB>...]`).
    ///
    /// Boosters and negations keep their built-in values. Blank lines and
    /// lines starting with `#` are skipped; unparsable lines are counted and
    /// logged.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let mut valences = HashMap::new();
        let mut skipped = 0usize;

        for line in content.lines() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().map(str::trim).unwrap_or_default();
            let score = fields.next().and_then(|s| s.trim().parse::<f64>().ok());

            match score {
                Some(score) if !token.is_empty() && score.is_finite() => {
                    valences.insert(token.to_lowercase(), score);
                }
                _ => skipped += 1,
            }
        }

        if valences.is_empty() {
            return Err(SentimentError::InvalidData(format!(
                "lexicon file {} contains no valid entries",
                path.display()
            )));
        }
        if skipped > 0 {
            warn!(skipped, path = %path.display(), "skipped malformed lexicon lines");
        }
        info!(entries = valences.len(), path = %path.display(), "loaded lexicon");

        Ok(Self {
            valences,
            boosters: default_boosters(),
            negations: default_negations(),
        })
    }

    pub fn stats(&self) -> LexiconStats {
        LexiconStats {
            positive_count: self.valences.values().filter(|v| **v > 0.0).count(),
            negative_count: self.valences.values().filter(|v| **v < 0.0).count(),
            booster_count: self.boosters.len(),
            negation_count: self.negations.len(),
        }
    }
}

impl Default for GeneralLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentLexicon for GeneralLexicon {
    fn get_score(&self, word: &str) -> Option<f64> {
        self.valences
            .get(word)
            .or_else(|| self.valences.get(&word.to_lowercase()))
            .copied()
    }

    fn get_booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(&word.to_lowercase()).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.negations.contains(&lower) || lower.ends_with("n't")
    }
}

/// Lexicon size summary
#[derive(Debug, Clone)]
pub struct LexiconStats {
    pub positive_count: usize,
    pub negative_count: usize,
    pub booster_count: usize,
    pub negation_count: usize,
}

fn default_boosters() -> HashMap<String, f64> {
    let increments = [
        "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly",
        "deeply", "enormously", "entirely", "especially", "exceptionally", "extremely",
        "fabulously", "greatly", "highly", "hugely", "incredibly", "intensely", "majorly",
        "more", "most", "particularly", "purely", "quite", "really", "remarkably", "so",
        "substantially", "thoroughly", "totally", "tremendously", "uber", "unbelievably",
        "unusually", "utterly", "very", "super", "sooo", "soooo",
    ];
    let decrements = [
        "almost", "barely", "hardly", "kinda", "kindof", "less", "little",
        "marginally", "occasionally", "partly", "scarcely", "slightly", "somewhat", "sort",
        "sorta", "sortof",
    ];

    increments
        .iter()
        .map(|w| (w.to_string(), BOOSTER_INCREMENT))
        .chain(decrements.iter().map(|w| (w.to_string(), DAMPENER_DECREMENT)))
        .collect()
}

fn default_negations() -> HashSet<String> {
    [
        "not", "no", "never", "neither", "nor", "none", "nobody", "nothing", "nowhere",
        "without", "cannot", "aint", "arent", "cant", "couldnt", "darent", "didnt", "doesnt",
        "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neednt", "oughtnt",
        "shant", "shouldnt", "wasnt", "werent", "wont", "wouldnt", "rarely", "seldom",
        "despite",
    ]
    .into_iter()
    .map(|s| s.to_string())
    .collect()
}

/// Built-in valences
const BUILTIN_VALENCES: &[(&str, f64)] = &[
    // positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("loving", 2.9),
    ("lovely", 2.8),
    ("like", 1.5),
    ("liked", 1.8),
    ("likes", 1.8),
    ("good", 1.9),
    ("great", 3.1),
    ("greatest", 3.2),
    ("awesome", 3.1),
    ("amazing", 2.8),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("brilliant", 2.8),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("happy", 2.7),
    ("happiness", 2.6),
    ("glad", 2.0),
    ("joy", 2.8),
    ("fun", 2.3),
    ("funny", 1.9),
    ("cool", 1.3),
    ("beautiful", 2.9),
    ("pretty", 2.2),
    ("cute", 2.0),
    ("perfect", 2.7),
    ("win", 2.8),
    ("won", 2.7),
    ("winning", 2.4),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("thankful", 2.7),
    ("grateful", 2.0),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("enjoying", 2.4),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("yay", 2.4),
    ("woohoo", 2.3),
    ("hope", 1.9),
    ("hopeful", 1.6),
    ("proud", 2.1),
    ("smile", 1.5),
    ("smiling", 1.7),
    ("laugh", 2.6),
    ("lol", 1.8),
    ("haha", 2.0),
    ("hahaha", 2.6),
    ("sweet", 2.0),
    ("yummy", 2.4),
    ("delicious", 2.7),
    ("favorite", 2.0),
    ("fav", 2.0),
    ("welcome", 2.0),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("success", 2.7),
    ("successful", 2.8),
    ("kind", 2.4),
    ("friendly", 2.2),
    ("fine", 0.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("well", 1.1),
    ("free", 2.3),
    ("safe", 1.9),
    ("relaxed", 2.2),
    ("relaxing", 2.2),
    ("comfortable", 1.5),
    ("peace", 2.5),
    ("peaceful", 2.2),
    ("calm", 1.3),
    ("care", 2.2),
    ("helpful", 1.8),
    ("help", 1.7),
    ("interesting", 1.7),
    ("impressive", 2.3),
    ("incredible", 2.2),
    ("superb", 3.1),
    ("outstanding", 3.0),
    ("adorable", 2.2),
    ("agree", 1.5),
    ("yes", 1.7),
    ("positive", 2.6),
    ("true", 1.6),
    ("strong", 2.3),
    ("hug", 2.1),
    ("hugs", 2.2),
    ("kiss", 1.8),
    ("miss", -0.6),
    ("heaven", 2.7),
    ("paradise", 3.2),
    ("bless", 1.8),
    ("blessed", 2.9),
    ("wow", 2.8),
    ("pleased", 1.9),
    ("pleasure", 2.7),
    ("satisfied", 1.8),
    ("glorious", 3.2),
    ("rocks", 1.8),
    ("rock", 1.1),
    ("fresh", 1.3),
    ("ready", 1.5),
    ("trust", 2.3),
    ("worth", 0.9),
    ("celebrate", 2.7),
    ("party", 1.7),
    ("birthday", 1.8),
    ("holiday", 1.7),
    ("weekend", 1.2),
    ("sunshine", 2.2),
    ("sunny", 2.1),
    ("awesomeness", 3.1),
    ("luck", 2.0),
    ("lucky", 1.8),
    ("special", 1.7),
    ("fabulous", 2.4),
    ("gorgeous", 3.0),
    ("smart", 1.7),
    ("clever", 1.8),
    ("cheer", 2.3),
    ("cheers", 2.1),
    ("nicely", 1.9),
    ("gladly", 1.4),
    (":)", 2.0),
    (":-)", 1.3),
    (":d", 2.9),
    (";)", 0.9),
    ("<3", 1.9),
    // negative
    ("hate", -2.7),
    ("hated", -3.2),
    ("hates", -1.9),
    ("hating", -2.3),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("sad", -2.1),
    ("sadly", -1.9),
    ("sadness", -1.9),
    ("unhappy", -1.8),
    ("cry", -2.1),
    ("crying", -2.1),
    ("cried", -1.6),
    ("tears", -0.9),
    ("angry", -2.3),
    ("anger", -2.7),
    ("mad", -2.2),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("upset", -1.6),
    ("hurt", -2.4),
    ("hurts", -2.1),
    ("pain", -2.3),
    ("painful", -1.9),
    ("sick", -2.3),
    ("ill", -1.8),
    ("tired", -1.9),
    ("bored", -1.1),
    ("boring", -1.3),
    ("ugly", -2.3),
    ("stupid", -2.4),
    ("dumb", -2.3),
    ("lame", -1.8),
    ("sucks", -1.5),
    ("suck", -1.9),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("lose", -1.7),
    ("lost", -1.3),
    ("losing", -1.6),
    ("problem", -1.7),
    ("problems", -1.7),
    ("wrong", -2.1),
    ("sorry", -0.3),
    ("fear", -2.2),
    ("afraid", -2.0),
    ("scared", -1.9),
    ("scary", -2.2),
    ("worried", -1.2),
    ("worry", -1.9),
    ("stress", -1.8),
    ("stressed", -1.4),
    ("depressed", -2.3),
    ("depressing", -1.6),
    ("lonely", -1.5),
    ("alone", -1.0),
    ("broken", -2.1),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disgusting", -2.4),
    ("gross", -2.1),
    ("nasty", -2.6),
    ("poor", -2.1),
    ("damn", -1.7),
    ("crap", -1.6),
    ("shit", -2.6),
    ("hell", -3.6),
    ("kill", -3.7),
    ("killed", -3.5),
    ("dead", -3.3),
    ("death", -2.9),
    ("die", -2.9),
    ("died", -2.6),
    ("war", -2.9),
    ("sucked", -2.0),
    ("ugh", -1.8),
    ("argh", -1.4),
    ("meh", -0.3),
    ("cancelled", -1.0),
    ("late", -0.4),
    ("rain", -0.2),
    ("headache", -2.0),
    ("missed", -1.2),
    ("missing", -1.2),
    ("hungry", -1.1),
    ("jealous", -2.0),
    ("guilty", -1.8),
    ("shame", -2.1),
    ("awkward", -0.6),
    ("rude", -2.0),
    ("mean", -1.1),
    ("crazy", -1.4),
    ("trouble", -1.7),
    ("difficult", -1.5),
    ("hard", -0.4),
    ("weak", -1.9),
    ("fake", -2.1),
    ("liar", -3.1),
    ("lies", -1.8),
    ("hopeless", -2.0),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("unfortunately", -1.8),
    ("fucking", -1.8),
    ("fuck", -2.5),
    ("wtf", -2.8),
    ("cruel", -2.8),
    ("evil", -3.4),
    ("tragic", -3.4),
    ("disaster", -3.1),
    ("horrific", -3.4),
    ("miserable", -2.2),
    ("misery", -2.7),
    ("ruined", -2.4),
    ("sore", -1.5),
    (":(", -1.9),
    (":-(", -1.5),
    (":'(", -2.2),
    (":/", -1.4),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_valences() {
        let lexicon = GeneralLexicon::new();

        assert!(lexicon.get_score("love").unwrap() > 2.0);
        assert!(lexicon.get_score("LOVE").unwrap() > 2.0);
        assert!(lexicon.get_score("hate").unwrap() < -2.0);
        assert!(lexicon.get_score("table").is_none());
    }

    #[test]
    fn test_negations_and_boosters() {
        let lexicon = GeneralLexicon::new();

        assert!(lexicon.is_negation("not"));
        assert!(lexicon.is_negation("don't"));
        assert!(lexicon.is_negation("isn't"));
        assert!(!lexicon.is_negation("love"));

        assert_eq!(lexicon.get_booster("very"), Some(BOOSTER_INCREMENT));
        assert_eq!(lexicon.get_booster("slightly"), Some(DAMPENER_DECREMENT));
        assert_eq!(lexicon.get_booster("table"), None);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "splendid\t2.5\t0.5\t[2, 3]").unwrap();
        writeln!(file, "dreadful\t-2.9").unwrap();
        writeln!(file, "broken line").unwrap();
        writeln!(file, "boundless\tinf").unwrap();
        writeln!(file).unwrap();

        let lexicon = GeneralLexicon::from_file(file.path()).unwrap();

        assert_eq!(lexicon.get_score("splendid"), Some(2.5));
        assert_eq!(lexicon.get_score("dreadful"), Some(-2.9));
        assert!(lexicon.get_score("love").is_none());
        assert!(lexicon.get_score("boundless").is_none());

        let stats = lexicon.stats();
        assert_eq!(stats.positive_count, 1);
        assert_eq!(stats.negative_count, 1);
    }

    #[test]
    fn test_from_file_rejects_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(GeneralLexicon::from_file(file.path()).is_err());
    }
}
