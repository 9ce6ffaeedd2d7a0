//! Text processing
//!
//! Includes:
//! - Tokenization of tweets
//! - Vectorization (Bag of Words, TF-IDF) into sparse rows

mod tokenizer;
mod vectorizer;

pub use tokenizer::{Tokenizer, MENTION_TOKEN, URL_TOKEN};
pub use vectorizer::{
    BagOfWords, DocumentTermMatrix, SparseVector, TextVectorizer, TfIdf, Vectorizer,
};
