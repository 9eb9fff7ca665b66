use std::sync::LazyLock;
use regex::Regex;
use crate::analysis::token::Token;

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9A-Za-z_\t\n\f\r ]").expect("punctuation pattern is valid")
});

/// Lowercases `text` and strips every character that is neither an ASCII
/// word character nor ASCII whitespace. Accented letters are dropped too,
/// so `café` becomes `caf`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    PUNCTUATION.replace_all(&lowered, "").into_owned()
}

/// Splits on runs of whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;

    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

/// Normalizing whitespace tokenizer
#[derive(Clone)]
pub struct WhitespaceTokenizer {
    pub normalize: bool,
}

impl Default for WhitespaceTokenizer {
    fn default() -> Self {
        WhitespaceTokenizer { normalize: true }
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let text_to_process = if self.normalize {
            normalize(text)
        } else {
            text.to_string()
        };

        tokenize(&text_to_process)
            .into_iter()
            .enumerate()
            .map(|(position, word)| Token::new(word, position as u32))
            .collect()
    }

    fn name(&self) -> &str {
        "whitespace"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}
