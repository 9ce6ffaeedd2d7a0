//! Tweet tokenizer
//!
//! Splits text into word tokens. URLs and @mentions are collapsed into
//! placeholder tokens, hashtags keep their word without the `#`.

use crate::models::{Token, TokenType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)[^\s]+").unwrap());
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static HASHTAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.?\d*$").unwrap());

/// Placeholder emitted for every URL
pub const URL_TOKEN: &str = "[url]";
/// Placeholder emitted for every @mention
pub const MENTION_TOKEN: &str = "[mention]";

/// Words longer than this are dropped as noise
const MAX_WORD_LENGTH: usize = 50;

/// Lowercasing text tokenizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokenizer {
    /// Minimum word length in characters
    min_word_length: usize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { min_word_length: 2 }
    }

    /// Set the minimum word length
    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_word_length = len;
        self
    }

    /// Tokenize text
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0;
        let mut processed_text = text.to_string();

        for url_match in URL_REGEX.find_iter(text) {
            tokens.push(Token {
                original: url_match.as_str().to_string(),
                normalized: URL_TOKEN.to_string(),
                position,
                token_type: TokenType::Url,
            });
            position += 1;
        }
        processed_text = URL_REGEX.replace_all(&processed_text, " ").to_string();

        for mention in MENTION_REGEX.find_iter(&processed_text) {
            tokens.push(Token {
                original: mention.as_str().to_string(),
                normalized: MENTION_TOKEN.to_string(),
                position,
                token_type: TokenType::Mention,
            });
            position += 1;
        }
        processed_text = MENTION_REGEX.replace_all(&processed_text, " ").to_string();

        for hashtag in HASHTAG_REGEX.find_iter(&processed_text) {
            let tag = &hashtag.as_str()[1..];
            if tag.chars().count() < self.min_word_length {
                continue;
            }
            tokens.push(Token {
                original: hashtag.as_str().to_string(),
                normalized: tag.to_lowercase(),
                position,
                token_type: TokenType::Hashtag,
            });
            position += 1;
        }
        processed_text = HASHTAG_REGEX.replace_all(&processed_text, " ").to_string();

        for word in processed_text.split_whitespace() {
            let cleaned = Self::clean_word(word);
            let len = cleaned.chars().count();

            if len == 0 || len < self.min_word_length || len > MAX_WORD_LENGTH {
                continue;
            }

            let token_type = if NUMBER_REGEX.is_match(&cleaned) {
                TokenType::Number
            } else {
                TokenType::Word
            };

            tokens.push(Token {
                normalized: cleaned.to_lowercase(),
                original: cleaned,
                position,
                token_type,
            });
            position += 1;
        }

        tokens
    }

    /// Tokenize and keep only the normalized strings
    pub fn tokenize_to_strings(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .map(|t| t.normalized)
            .collect()
    }

    pub fn tokenize_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| self.tokenize_to_strings(t.as_ref()))
            .collect()
    }

    /// Strip punctuation, keeping letters, digits, `-` and `_`
    fn clean_word(word: &str) -> String {
        let kept: String = word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        kept.trim_matches(|c| c == '-' || c == '_').to_string()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello World");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].normalized, "hello");
        assert_eq!(tokens[1].normalized, "world");
    }

    #[test]
    fn test_punctuation_stripped() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_to_strings("I can't believe it... AMAZING!!!");

        assert_eq!(tokens, vec!["cant", "believe", "it", "amazing"]);
    }

    #[test]
    fn test_special_tokens() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("@bob loving #summer http://t.co/xyz");

        assert!(tokens
            .iter()
            .any(|t| t.token_type == TokenType::Mention && t.normalized == MENTION_TOKEN));
        assert!(tokens
            .iter()
            .any(|t| t.token_type == TokenType::Hashtag && t.normalized == "summer"));
        assert!(tokens
            .iter()
            .any(|t| t.token_type == TokenType::Url && t.normalized == URL_TOKEN));
        assert!(tokens.iter().any(|t| t.normalized == "loving"));
    }

    #[test]
    fn test_min_length_filter() {
        let tokenizer = Tokenizer::new().with_min_length(3);
        let tokens = tokenizer.tokenize("I am a test");

        assert!(tokens.iter().all(|t| t.normalized.chars().count() >= 3));
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   !!! ").is_empty());
    }

    #[test]
    fn test_overlong_words_dropped() {
        let tokenizer = Tokenizer::new();
        let noise = "a".repeat(MAX_WORD_LENGTH + 1);
        let tokens = tokenizer.tokenize_to_strings(&format!("Fine {} DAY", noise));
        assert_eq!(tokens, vec!["fine", "day"]);
    }

    #[test]
    fn test_numbers_typed() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("scored 42 points");
        assert_eq!(tokens[1].token_type, TokenType::Number);
    }
}
