use std::collections::HashSet;
use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Closed stopword set shared by indexing and querying.
pub const ENGLISH_STOP_WORDS: [&str; 10] = [
    "the", "is", "and", "a", "an", "in", "of", "on", "at", "to",
];

/// Drops stopwords, keeping the relative order of the rest.
pub fn remove_stop_words(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter()
        .filter(|token| !ENGLISH_STOP_WORDS.contains(&token.as_str()))
        .collect()
}

pub struct StopWordFilter {
    pub stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: Vec<String>) -> Self {
        StopWordFilter {
            stop_words: stop_words.into_iter().collect(),
        }
    }

    pub fn english() -> Self {
        StopWordFilter::new(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect())
    }
}

impl TokenFilter for StopWordFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .filter(|token| !self.stop_words.contains(&token.text))
            .collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(StopWordFilter {
            stop_words: self.stop_words.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn removes_only_listed_words() {
        assert_eq!(remove_stop_words(words(&["hello", "world"])), words(&["hello", "world"]));
        assert!(remove_stop_words(words(&["the", "is", "and"])).is_empty());
        assert_eq!(
            remove_stop_words(words(&["the", "quick", "brown", "fox"])),
            words(&["quick", "brown", "fox"])
        );
        assert!(remove_stop_words(Vec::new()).is_empty());
    }

    #[test]
    fn filter_keeps_positions_of_survivors() {
        let tokens = vec![
            Token::new("over".into(), 0),
            Token::new("the".into(), 1),
            Token::new("dog".into(), 2),
        ];
        let kept = StopWordFilter::english().filter(tokens);
        assert_eq!(kept, vec![Token::new("over".into(), 0), Token::new("dog".into(), 2)]);
    }
}
