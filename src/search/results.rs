use std::time::Duration;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use crate::core::error::Result;
use crate::core::types::Document;

/// Meta record that precedes the documents of a `find` / `get_doc` answer.
/// Its field names are part of the wire contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    pub matched_records: usize,
    pub total_records: usize,
    pub returned_records: usize,
    #[serde(serialize_with = "serialize_duration")]
    pub total_time: Duration,
}

impl ResultMeta {
    /// All counts zero
    pub fn empty(total_time: Duration) -> Self {
        ResultMeta { total_time, ..ResultMeta::default() }
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:?}", duration))
}

/// Search results container
///
/// `meta` is `None` only for the "nothing to search" answers (empty index,
/// negative page size); every other outcome carries a meta record, even
/// when no document is returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindResult {
    pub meta: Option<ResultMeta>,
    pub documents: Vec<Document>,
}

impl FindResult {
    pub fn empty() -> Self {
        FindResult::default()
    }

    pub fn meta_only(meta: ResultMeta) -> Self {
        FindResult { meta: Some(meta), documents: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.meta.is_none() && self.documents.is_empty()
    }

    pub fn matched(&self) -> usize {
        self.meta.as_ref().map(|m| m.matched_records).unwrap_or(0)
    }

    pub fn returned(&self) -> usize {
        self.meta.as_ref().map(|m| m.returned_records).unwrap_or(0)
    }

    pub fn doc_ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.id.as_str()).collect()
    }

    /// Wire shape: `[{"meta": {...}}, doc, doc, ...]`, or `[]` without meta.
    pub fn to_json(&self) -> Result<Value> {
        let mut entries = Vec::with_capacity(self.documents.len() + 1);
        if let Some(meta) = &self.meta {
            entries.push(json!({ "meta": meta }));
        }
        for doc in &self.documents {
            entries.push(serde_json::to_value(doc)?);
        }
        Ok(Value::Array(entries))
    }
}
