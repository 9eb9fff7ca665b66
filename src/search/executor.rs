use std::collections::HashSet;
use std::time::Instant;
use crate::analysis::analyzer::Analyzer;
use crate::core::config::EngineConfig;
use crate::core::engine::EngineState;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document, Filter};
use crate::query::matcher::{DocumentMatcher, FieldClause};
use crate::query::types::{resolve, FindOptions, ResolvedOptions, SortOrder};
use crate::search::results::{FindResult, ResultMeta};

/// Read-side operations over a locked `EngineState`
pub struct QueryExecutor<'a> {
    pub state: &'a EngineState,
    pub analyzer: &'a Analyzer,
    pub config: &'a EngineConfig,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(state: &'a EngineState, analyzer: &'a Analyzer, config: &'a EngineConfig) -> Self {
        QueryExecutor { state, analyzer, config }
    }

    fn resolve(&self, opts: Option<&FindOptions>) -> ResolvedOptions {
        resolve(opts, self.config.default_limit)
    }

    pub fn find(&self, filter: &Filter, opts: Option<&FindOptions>) -> Result<FindResult> {
        let start_time = Instant::now();

        if self.state.index.is_empty() {
            return Ok(FindResult::empty());
        }

        // Validate the whole filter before matching anything
        let mut fields: Vec<_> = filter.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        let mut clauses = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            let text = value.as_text().ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidFilterValue,
                    format!("non-string filter value for '{}': {}", field, value),
                )
            })?;
            clauses.push(FieldClause::new(field, text, self.analyzer));
        }

        let options = self.resolve(opts);
        if options.is_empty_page() {
            return Ok(FindResult::empty());
        }

        let matcher = DocumentMatcher::new(&self.state.index, &self.state.documents, self.analyzer);
        let Some(matched) = matcher.matches(&clauses, options.match_type) else {
            return Ok(FindResult::meta_only(ResultMeta::empty(start_time.elapsed())));
        };

        let doc_ids = self.sort_matches(matched, options.sort);
        let total_records = self.state.documents.len();

        let start = options.start as usize;
        if start >= doc_ids.len() {
            return Ok(FindResult::meta_only(ResultMeta {
                total_records,
                ..ResultMeta::empty(start_time.elapsed())
            }));
        }
        let end = start.saturating_add(options.limit as usize).min(doc_ids.len());

        let documents: Vec<Document> = doc_ids[start..end].iter()
            .filter_map(|id| self.state.documents.get(id).cloned())
            .collect();

        Ok(FindResult {
            meta: Some(ResultMeta {
                matched_records: doc_ids.len(),
                total_records,
                returned_records: documents.len(),
                total_time: start_time.elapsed(),
            }),
            documents,
        })
    }

    /// Orders by the configured numeric sort field when every matched
    /// document has one, ties broken by id. Otherwise orders by id
    /// ascending regardless of `sort`.
    fn sort_matches(&self, matched: HashSet<DocId>, sort: SortOrder) -> Vec<DocId> {
        let sort_field = self.config.sort_field.as_str();
        let keyed: Vec<(DocId, Option<f64>)> = matched.into_iter()
            .map(|id| {
                let key = self.state.documents.get(&id)
                    .and_then(|doc| doc.get_field(sort_field))
                    .and_then(|value| value.as_number());
                (id, key)
            })
            .collect();

        if keyed.iter().all(|(_, key)| key.is_some()) {
            let mut keyed: Vec<(DocId, f64)> = keyed.into_iter()
                .filter_map(|(id, key)| key.map(|k| (id, k)))
                .collect();
            keyed.sort_by(|(id_a, a), (id_b, b)| {
                let by_key = match sort {
                    SortOrder::Ascending => a.total_cmp(b),
                    SortOrder::Descending => b.total_cmp(a),
                };
                by_key.then_with(|| id_a.cmp(id_b))
            });
            keyed.into_iter().map(|(id, _)| id).collect()
        } else {
            let mut ids: Vec<DocId> = keyed.into_iter().map(|(id, _)| id).collect();
            ids.sort();
            ids
        }
    }

    /// Recency window `[start, start + limit)` counted back from the newest
    /// entry, as positions into the recency order (oldest first).
    fn recency_window(&self, options: &ResolvedOptions) -> std::ops::Range<usize> {
        let total = self.state.order.len() as i64;
        let end = (total - options.start).clamp(0, total);
        let begin = (end - options.limit).clamp(0, end);
        begin as usize..end as usize
    }

    pub fn get(&self, opts: Option<&FindOptions>) -> Vec<Document> {
        let options = self.resolve(opts);
        if options.is_empty_page() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.state.order[self.recency_window(&options)].iter()
            .rev()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.state.documents.get(id).cloned())
            .collect()
    }

    pub fn get_doc(&self, keyword: &str, opts: Option<&FindOptions>) -> FindResult {
        let start_time = Instant::now();
        let options = self.resolve(opts);
        if options.is_empty_page() {
            return FindResult::empty();
        }

        let keyword = keyword.to_lowercase();

        // Pass one: count matches over the whole recency order
        let mut seen = HashSet::new();
        let matched_records = self.state.order.iter()
            .rev()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.state.documents.get(id))
            .filter(|doc| contains_keyword(doc, &keyword))
            .count();

        // Pass two: only the paginated recency window
        let mut seen = HashSet::new();
        let documents: Vec<Document> = self.state.order[self.recency_window(&options)].iter()
            .rev()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.state.documents.get(id))
            .filter(|doc| contains_keyword(doc, &keyword))
            .cloned()
            .collect();

        FindResult {
            meta: Some(ResultMeta {
                matched_records,
                total_records: self.state.order.len(),
                returned_records: documents.len(),
                total_time: start_time.elapsed(),
            }),
            documents,
        }
    }
}

/// `keyword` must already be lowercased.
fn contains_keyword(doc: &Document, keyword: &str) -> bool {
    doc.fields.values()
        .any(|value| value.to_string().to_lowercase().contains(keyword))
}
