use rust_stemmers::Algorithm;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, WhitespaceTokenizer};

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Term texts only, in order.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|token| token.text).collect()
    }

    /// normalize -> tokenize -> remove stopwords -> stem. Used for both
    /// document field values and query filter values.
    pub fn standard() -> Self {
        Analyzer::new("standard".to_string(),
                      Box::new(WhitespaceTokenizer::default()))
            .add_filter(Box::new(StopWordFilter::english()))
            .add_filter(Box::new(StemmerFilter::new(Algorithm::English)))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::standard()
    }
}

impl Clone for Analyzer {
    fn clone(&self) -> Self {
        Analyzer {
            tokenizer: self.tokenizer.clone_box(),
            filters: self.filters.iter().map(|f| f.clone_box()).collect(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn standard_pipeline_matches_free_functions() {
        let text = "The quick brown fox jumps over the lazy dog";
        let analyzer = Analyzer::standard();
        assert_eq!(analyzer.terms(text), analyze(text));
        assert_eq!(
            analyzer.terms(text),
            vec!["quick", "brown", "fox", "jump", "over", "lazi", "dog"]
        );
    }

    #[test]
    fn stopwords_leave_position_gaps() {
        let tokens = Analyzer::standard().analyze("fox in the forest");
        let positions: Vec<_> = tokens.iter().map(|t| (t.text.as_str(), t.position)).collect();
        assert_eq!(positions, vec![("fox", 0), ("forest", 3)]);
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert!(Analyzer::standard().analyze("?!, ... --").is_empty());
    }
}
