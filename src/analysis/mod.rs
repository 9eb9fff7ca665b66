pub mod analyzer;
pub mod filter;
pub mod filters;
pub mod token;
pub mod tokenizer;

pub use filters::stemmer::stem;
pub use filters::stopword::remove_stop_words;
pub use tokenizer::{normalize, tokenize};

/// The full pipeline as plain functions: normalize, tokenize, drop
/// stopwords, stem.
pub fn analyze(text: &str) -> Vec<String> {
    stem(remove_stop_words(tokenize(&normalize(text))))
}
