use std::collections::{HashMap, HashSet};
use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::core::types::{DocId, Document};
use crate::index::inverted::InvertedIndex;
use crate::query::types::MatchType;

/// One analyzed filter entry: the field it names and the tokens its value produced.
#[derive(Debug, Clone)]
pub struct FieldClause {
    pub field: String,
    pub tokens: Vec<Token>,
}

impl FieldClause {
    pub fn new(field: &str, value: &str, analyzer: &Analyzer) -> Self {
        FieldClause {
            field: field.to_string(),
            tokens: analyzer.analyze(value),
        }
    }

    fn terms(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|token| token.text.as_str())
    }
}

/// Document matcher - combines per-field posting unions according to a `MatchType`
pub struct DocumentMatcher<'a> {
    index: &'a InvertedIndex,
    documents: &'a HashMap<DocId, Document>,
    analyzer: &'a Analyzer,
}

impl<'a> DocumentMatcher<'a> {
    pub fn new(
        index: &'a InvertedIndex,
        documents: &'a HashMap<DocId, Document>,
        analyzer: &'a Analyzer,
    ) -> Self {
        DocumentMatcher { index, documents, analyzer }
    }

    /// Returns `None` when no clause produced any term, which callers report
    /// as a zero-count result rather than as "nothing matched".
    pub fn matches(&self, clauses: &[FieldClause], match_type: MatchType) -> Option<HashSet<DocId>> {
        let mut combined: Option<HashSet<DocId>> = None;

        for clause in clauses.iter().filter(|c| !c.tokens.is_empty()) {
            // OR within a single field
            let current = self.index.union_of(clause.terms());

            combined = Some(match (combined, match_type) {
                (None, _) => current,
                (Some(mut acc), MatchType::Or) => {
                    acc.extend(current);
                    acc
                }
                (Some(mut acc), MatchType::And | MatchType::Phrase) => {
                    acc.retain(|id| current.contains(id));
                    acc
                }
            });
        }

        if match_type == MatchType::Phrase {
            if let Some(candidates) = combined.as_mut() {
                candidates.retain(|id| self.matches_phrases(id, clauses));
            }
        }

        combined
    }

    fn matches_phrases(&self, doc_id: &DocId, clauses: &[FieldClause]) -> bool {
        let Some(doc) = self.documents.get(doc_id) else {
            return false;
        };

        clauses.iter()
            .filter(|c| !c.tokens.is_empty())
            .all(|clause| {
                doc.get_field(&clause.field)
                    .map(|value| {
                        let field_tokens = self.analyzer.analyze(&value.to_string());
                        contains_phrase(&field_tokens, &clause.tokens)
                    })
                    .unwrap_or(false)
            })
    }
}

/// True when `phrase` occurs in `tokens` with the same relative positions.
/// Positions come from the tokenizer, so a stopword gap in the query must be
/// mirrored by a gap of the same width in the field.
pub fn contains_phrase(tokens: &[Token], phrase: &[Token]) -> bool {
    let Some(first) = phrase.first() else {
        return false;
    };

    let by_position: HashMap<u32, &str> = tokens.iter()
        .map(|t| (t.position, t.text.as_str()))
        .collect();

    tokens.iter()
        .filter(|t| t.text == first.text)
        .any(|anchor| {
            phrase.iter().all(|p| {
                let offset = p.position - first.position;
                by_position.get(&(anchor.position + offset)) == Some(&p.text.as_str())
            })
        })
}
