//! Interactive scoring session
//!
//! Two request handlers over immutable state: lexicon-score a text, or
//! classify it with the trained model. A line-oriented loop drives them
//! from any reader/writer pair.

use crate::classifier::SentimentClassifier;
use crate::config::Config;
use crate::error::{Result, SentimentError};
use crate::models::{Polarity, ScoreResult};
use crate::persistence::ArtifactStore;
use crate::sentiment::LexiconScorer;
use serde::Serialize;
use std::fmt;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Classifier answer for one text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub label: Polarity,
    /// Probability of the positive class
    pub probability: f64,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (p_positive = {:.4})", self.label, self.probability)
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Score(String),
    Classify(String),
    /// Run both handlers on the text
    Both(String),
    Help,
    Quit,
}

impl Command {
    /// `score <text>`, `classify <text>`, `help`, `quit`; bare text runs both
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "score" => Command::Score(rest.to_string()),
            "classify" => Command::Classify(rest.to_string()),
            "help" | "?" if rest.is_empty() => Command::Help,
            "quit" | "exit" if rest.is_empty() => Command::Quit,
            _ => Command::Both(line.to_string()),
        }
    }
}

const HELP: &str = "\
Commands:
  score <text>      lexicon compound score and label
  classify <text>   trained classifier label and probability
  <text>            both of the above
  help              this message
  quit              leave the session";

/// Lexicon scorer plus an optional trained classifier
pub struct SentimentSession {
    scorer: LexiconScorer,
    classifier: Option<SentimentClassifier>,
}

impl SentimentSession {
    pub fn new(scorer: LexiconScorer, classifier: Option<SentimentClassifier>) -> Self {
        Self { scorer, classifier }
    }

    /// Build from config. A missing model is not an error here; `classify`
    /// reports it per request.
    pub fn load(config: &Config) -> Result<Self> {
        let scorer = LexiconScorer::from_config(&config.lexicon)?;
        let store = ArtifactStore::new(&config.artifacts.model_dir);

        let classifier = match store.load_classifier() {
            Ok(classifier) => {
                info!("Loaded classifier from {}", store.dir().display());
                Some(classifier)
            }
            Err(SentimentError::ModelUnavailable(msg)) => {
                warn!("Classifier unavailable: {}", msg);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self::new(scorer, classifier))
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn score(&self, text: &str) -> ScoreResult {
        self.scorer.score(text)
    }

    pub fn classify(&self, text: &str) -> Result<Classification> {
        let classifier = self.classifier.as_ref().ok_or_else(|| {
            SentimentError::ModelUnavailable("no trained classifier loaded".to_string())
        })?;

        let probability = classifier.predict_proba(text)?;
        Ok(Classification {
            label: SentimentClassifier::label_for(probability),
            probability,
        })
    }

    /// Render the response to one command; `None` ends the session
    pub fn respond(&self, command: &Command) -> Option<String> {
        let response = match command {
            Command::Score(text) => self.render_score(text),
            Command::Classify(text) => self.render_classification(text),
            Command::Both(text) => format!(
                "{}\n{}",
                self.render_score(text),
                self.render_classification(text)
            ),
            Command::Help => HELP.to_string(),
            Command::Quit => return None,
        };
        Some(response)
    }

    /// Read commands line by line until EOF or `quit`
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "Type a tweet, or 'help' for commands.")?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match self.respond(&Command::parse(&line)) {
                Some(response) => writeln!(output, "{}", response)?,
                None => break,
            }
            output.flush()?;
        }

        Ok(())
    }

    fn render_score(&self, text: &str) -> String {
        let result = self.score(text);
        let mut s = format!(
            "lexicon:    {} (compound = {:+.4})",
            result.polarity, result.compound
        );
        if !result.key_words.is_empty() {
            let words: Vec<String> = result
                .key_words
                .iter()
                .map(|w| format!("{} {:+.2}", w.word, w.score))
                .collect();
            s.push_str(&format!(" [{}]", words.join(", ")));
        }
        s
    }

    fn render_classification(&self, text: &str) -> String {
        match self.classify(text) {
            Ok(c) => format!("classifier: {}", c),
            Err(e) => format!("classifier: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierConfig, VectorizerConfig};
    use crate::models::Record;

    fn session_with_model() -> SentimentSession {
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
        SentimentSession::new(LexiconScorer::new(), Some(clf))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("score I love this"), Command::Score("I love this".into()));
        assert_eq!(Command::parse("CLASSIFY  meh "), Command::Classify("meh".into()));
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("quit smoking now"), Command::Both("quit smoking now".into()));
        assert_eq!(Command::parse("score"), Command::Score(String::new()));
    }

    #[test]
    fn test_score_handler() {
        let session = SentimentSession::new(LexiconScorer::new(), None);
        assert_eq!(session.score("I love this!").polarity, Polarity::Positive);
        assert_eq!(session.score("").polarity, Polarity::Neutral);
    }

    #[test]
    fn test_classify_without_model() {
        let session = SentimentSession::new(LexiconScorer::new(), None);
        assert!(!session.has_classifier());
        assert!(matches!(
            session.classify("anything"),
            Err(SentimentError::ModelUnavailable(_))
        ));

        let response = session.respond(&Command::Classify("x".into())).unwrap();
        assert!(response.contains("Model unavailable"));
    }

    #[test]
    fn test_classify_with_model() {
        let session = session_with_model();
        let c = session.classify("love love great").unwrap();
        assert_eq!(c.label, Polarity::Positive);
        assert!(c.probability > 0.5);
        assert!(session.classify("").is_ok());
    }

    #[test]
    fn test_classify_agrees_with_classifier() {
        let session = session_with_model();
        let clf = session.classifier.as_ref().unwrap();

        for text in ["love great", "hate awful", "", "great hate", "unknown"] {
            let c = session.classify(text).unwrap();
            assert_eq!(c.label, clf.predict(text).unwrap());
            assert_eq!(c.probability, clf.predict_proba(text).unwrap());
        }
    }

    #[test]
    fn test_run_loop() {
        let session = session_with_model();
        let input = b"score I hate this.\n\nclassify great love\nquit\nscore never reached\n";
        let mut output = Vec::new();

        session.run(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("lexicon:    negative"));
        assert!(text.contains("classifier: positive"));
        assert!(!text.contains("never reached"));
    }

    #[test]
    fn test_load_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.artifacts.model_dir = dir.path().to_path_buf();

        let session = SentimentSession::load(&config).unwrap();
        assert!(!session.has_classifier());
    }
}
