use std::collections::HashMap;
use std::time::Instant;
use parking_lot::RwLock;
use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::core::config::EngineConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::{EngineStats, IndexReport};
use crate::core::types::{DocId, Document, Fields, Filter};
use crate::index::inverted::InvertedIndex;
use crate::query::types::FindOptions;
use crate::search::executor::QueryExecutor;
use crate::search::results::FindResult;

/// Everything the engine guards with its single lock.
#[derive(Debug, Default)]
pub struct EngineState {
    pub documents: HashMap<DocId, Document>,
    pub index: InvertedIndex,
    pub order: Vec<DocId>,     // recency: unique ids, most recently indexed last
    pub closed: bool,
}

impl EngineState {
    fn clear(&mut self) {
        self.documents.clear();
        self.index.clear();
        self.order.clear();
    }

    fn touch_order(&mut self, doc_id: &DocId) {
        if let Some(pos) = self.order.iter().position(|id| id == doc_id) {
            self.order.remove(pos);
        }
        self.order.push(doc_id.clone());
    }
}

/// In-memory document store and inverted index.
///
/// Every accessor goes through one reader-writer lock: `index`, `reset` and
/// `close` take it exclusively, queries share it. A query therefore always
/// observes the state between two complete `index` calls, and document map,
/// postings and recency order never disagree with each other.
///
/// Share an engine between ingestion workers and query handlers with `Arc`.
pub struct Engine {
    config: EngineConfig,
    analyzer: Analyzer,
    state: RwLock<EngineState>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_analyzer(config, Analyzer::standard())
    }

    pub fn with_analyzer(config: EngineConfig, analyzer: Analyzer) -> Self {
        Engine {
            config,
            analyzer,
            state: RwLock::new(EngineState::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Stores `fields` under `doc_id` and indexes every field value.
    ///
    /// Indexing an id that already exists replaces the document wholesale,
    /// retracts the postings of its previous content and moves it to the
    /// most-recent end of the recency order.
    pub fn index(&self, fields: Fields, doc_id: impl Into<DocId>) -> Result<IndexReport> {
        let start = Instant::now();
        let doc_id = doc_id.into();

        if doc_id.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "Document id must not be empty".to_string()));
        }

        // Analysis needs no shared state, keep it out of the critical section
        let tokens: Vec<Token> = fields.values()
            .flat_map(|value| self.analyzer.analyze(&value.to_string()))
            .collect();

        let mut state = self.state.write();
        if state.closed {
            return Err(Error::new(ErrorKind::InvalidState, "Engine is closed".to_string()));
        }

        state.index.remove_document(&doc_id);
        state.documents.insert(doc_id.clone(), Document::with_fields(doc_id.clone(), fields));
        state.touch_order(&doc_id);
        let term_count = state.index.add_document(&doc_id, &tokens);
        drop(state);

        let elapsed = start.elapsed();
        tracing::trace!(target: "sage::engine", doc_id = %doc_id, term_count, ?elapsed, "indexed document");

        Ok(IndexReport { elapsed, term_count })
    }

    pub fn index_document(&self, doc: Document) -> Result<IndexReport> {
        self.index(doc.fields, doc.id)
    }

    /// Indexed, exact-term search. Each filter value is analyzed like a
    /// document field; the posting lists of its terms are unioned, and the
    /// per-field sets are combined according to the match type (AND by
    /// default). Fails with `InvalidFilterValue` if any filter value is not
    /// text, unless nothing is indexed yet.
    ///
    /// Matches are ordered by the configured sort field when every one of
    /// them has a numeric value there. Text that parses as a float counts,
    /// so CSV-ingested `Timestamp` columns sort by time rather than by id.
    pub fn find(&self, filter: &Filter, opts: Option<&FindOptions>) -> Result<FindResult> {
        let state = self.state.read();
        self.executor(&state).find(filter, opts)
    }

    /// Most recently indexed documents, newest first.
    pub fn get(&self, opts: Option<&FindOptions>) -> Vec<Document> {
        let state = self.state.read();
        self.executor(&state).get(opts)
    }

    /// Case-insensitive substring scan over every field of every document,
    /// newest first.
    ///
    /// This does not use the inverted index: it stringifies and scans every
    /// field of every stored document, O(documents x fields) per call. Prefer
    /// `find` for exact-term lookups; use `get_doc` when partial words or
    /// unanalyzed text must match in any field.
    pub fn get_doc(&self, keyword: &str, opts: Option<&FindOptions>) -> FindResult {
        let state = self.state.read();
        self.executor(&state).get_doc(keyword, opts)
    }

    /// Total number of stored documents.
    pub fn get_stats(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn stats(&self) -> EngineStats {
        let state = self.state.read();
        EngineStats {
            total_documents: state.documents.len(),
            distinct_terms: state.index.term_count(),
            total_postings: state.index.total_postings(),
            recency_len: state.order.len(),
        }
    }

    pub fn get_document(&self, doc_id: &str) -> Option<Document> {
        self.state.read().documents.get(doc_id).cloned()
    }

    /// Doc ids posted under `term` (an already analyzed term), in insertion order.
    pub fn posting_list(&self, term: &str) -> Option<Vec<DocId>> {
        self.state.read().index.search_term(term).map(|list| list.doc_ids.clone())
    }

    /// All indexed terms, sorted.
    pub fn terms(&self) -> Vec<String> {
        let state = self.state.read();
        let mut terms: Vec<String> = state.index.terms().map(|t| t.as_str().to_string()).collect();
        terms.sort();
        terms
    }

    /// Recency order, oldest first.
    pub fn recency_order(&self) -> Vec<DocId> {
        self.state.read().order.clone()
    }

    /// Drops every document and posting. The engine stays usable.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.clear();
        state.closed = false;
        tracing::debug!(target: "sage::engine", "engine reset");
    }

    /// Drops all state and rejects further `index` calls. Queries keep
    /// answering, against an empty engine.
    pub fn close(&self) {
        let mut state = self.state.write();
        state.clear();
        state.closed = true;
        tracing::debug!(target: "sage::engine", "engine closed");
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    fn executor<'a>(&'a self, state: &'a EngineState) -> QueryExecutor<'a> {
        QueryExecutor::new(state, &self.analyzer, &self.config)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
