use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use crate::analysis::token::Token;
use crate::core::types::DocId;
use crate::index::posting::PostingList;

/// Term representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term(String);

impl Term {
    pub fn new(text: &str) -> Self {
        Term(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Term {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Inverted index structure
///
/// Besides term -> postings it keeps the reverse mapping doc -> terms, so a
/// document that is indexed again can first be retracted from every posting
/// list its previous content contributed to.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub postings: HashMap<Term, PostingList>,
    pub doc_terms: HashMap<DocId, HashSet<Term>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex {
            postings: HashMap::new(),
            doc_terms: HashMap::new(),
        }
    }

    /// Adds `tokens` for `doc_id`, returning the number of tokens indexed.
    /// Callers retract the previous version first (see `remove_document`).
    pub fn add_document(&mut self, doc_id: &DocId, tokens: &[Token]) -> usize {
        let contributed = self.doc_terms.entry(doc_id.clone()).or_default();

        for token in tokens {
            let term = Term::new(&token.text);
            self.postings.entry(term.clone())
                .or_insert_with(PostingList::new)
                .add(doc_id);
            contributed.insert(term);
        }

        tokens.len()
    }

    /// Drops `doc_id` from every posting list it appears in. Posting lists
    /// left empty are removed so no term maps to nothing.
    pub fn remove_document(&mut self, doc_id: &DocId) {
        let Some(terms) = self.doc_terms.remove(doc_id) else {
            return;
        };

        for term in terms {
            if let Some(list) = self.postings.get_mut(&term) {
                list.remove(doc_id);
                if list.is_empty() {
                    self.postings.remove(&term);
                }
            }
        }
    }

    pub fn search_term(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Union of the posting lists of `terms`.
    pub fn union_of<'a, I>(&self, terms: I) -> HashSet<DocId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut matched = HashSet::new();
        for term in terms {
            if let Some(list) = self.postings.get(term) {
                matched.extend(list.iter().cloned());
            }
        }
        matched
    }

    /// Get an iterator over all terms in the index
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.postings.keys()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn total_postings(&self) -> usize {
        self.postings.values().map(PostingList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.doc_terms.clear();
    }
}
