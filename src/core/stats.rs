use serde::Serialize;

/// Point-in-time engine statistics, read under a single lock acquisition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub total_documents: usize,
    pub distinct_terms: usize,
    pub total_postings: usize,
    pub recency_len: usize,
}

/// Result of one `Engine::index` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReport {
    pub elapsed: std::time::Duration,
    pub term_count: usize,
}
