use rust_stemmers::{Algorithm, Stemmer};
use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Porter2 stems each token. A token the stemmer reduces to nothing is
/// dropped rather than passed through.
pub fn stem(tokens: Vec<String>) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    tokens.into_iter()
        .filter_map(|token| stem_one(&stemmer, &token))
        .collect()
}

fn stem_one(stemmer: &Stemmer, token: &str) -> Option<String> {
    let stemmed = stemmer.stem(token);
    if stemmed.is_empty() {
        None
    } else {
        Some(stemmed.into_owned())
    }
}

pub struct StemmerFilter {
    pub algorithm: Algorithm,
}

impl StemmerFilter {
    pub fn new(algorithm: Algorithm) -> Self {
        StemmerFilter { algorithm }
    }
}

impl TokenFilter for StemmerFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        let stemmer = Stemmer::create(self.algorithm);

        tokens.into_iter()
            .filter_map(|mut token| {
                token.text = stem_one(&stemmer, &token.text)?;
                Some(token)
            })
            .collect()
    }

    fn name(&self) -> &str {
        "stemmer"
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(StemmerFilter {
            algorithm: self.algorithm,
        })
    }
}
