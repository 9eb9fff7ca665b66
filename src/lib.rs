pub mod core;
pub mod analysis;
pub mod index;
pub mod search;
pub mod query;
pub mod parser;
pub mod parallel;

pub use crate::core::config::{Config, EngineConfig, IngestConfig};
pub use crate::core::engine::Engine;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::stats::{EngineStats, IndexReport};
pub use crate::core::types::{DocId, Document, FieldValue, Fields, Filter};
pub use crate::parallel::{IdStrategy, IngestReport, Ingestor};
pub use crate::query::types::{FindOptions, MatchType, SortOrder};
pub use crate::search::results::{FindResult, ResultMeta};

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                            SAGEDEX STRUCT ARCHITECTURE                        │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── CORE LAYER ──────────────────────────────────┐
│                                                                              │
│  ┌──────────────────────────────────────────────────────────────────────┐   │
│  │                           struct Engine                               │   │
│  │ config: EngineConfig             // sort field, default page size    │   │
│  │ analyzer: Analyzer               // shared by index and find         │   │
│  │ state: RwLock<EngineState>       // one lock for every accessor      │   │
│  │   ├ documents: HashMap<DocId, Document>                              │   │
│  │   ├ index: InvertedIndex                                             │   │
│  │   ├ order: Vec<DocId>            // recency, newest at the tail      │   │
│  │   └ closed: bool                                                     │   │
│  └──────────────────────────────────────────────────────────────────────┘   │
│                                                                              │
│  ┌──────────────────┐  ┌──────────────────┐  ┌────────────────────────┐     │
│  │ struct Document  │  │ enum FieldValue  │  │ struct EngineStats     │     │
│  │ • id: DocId      │  │ • Text(String)   │  │ • total_documents      │     │
│  │ • fields: Fields │  │ • Number(f64)    │  │ • distinct_terms       │     │
│  └──────────────────┘  │ • Boolean(bool)  │  │ • total_postings       │     │
│                        └──────────────────┘  │ • recency_len          │     │
│                                              └────────────────────────┘     │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── INDEX LAYER ─────────────────────────────────┐
│  ┌──────────────────────────┐  ┌──────────────────────────┐                  │
│  │ struct InvertedIndex     │  │ struct PostingList       │                  │
│  │ • postings: Term -> List │  │ • doc_ids: Vec<DocId>    │                  │
│  │ • doc_terms: DocId -> Set│  │ • add() / remove()       │                  │
│  └──────────────────────────┘  └──────────────────────────┘                  │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── QUERY LAYER ─────────────────────────────────┐
│  ┌──────────────────────────┐  ┌──────────────────────────┐                  │
│  │ struct QueryExecutor     │  │ struct DocumentMatcher   │                  │
│  │ • find() / get()         │  │ • AND / OR / PHRASE      │                  │
│  │ • get_doc()              │  │ • contains_phrase()      │                  │
│  └──────────────────────────┘  └──────────────────────────┘                  │
└──────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── INGESTION LAYER ───────────────────────────────┐
│  ┌──────────────────────────┐  ┌──────────────────────────┐                  │
│  │ struct Ingestor          │  │ trait RecordDecoder      │                  │
│  │ • walker -> bounded chan │  │ • CsvDecoder             │                  │
│  │ • N workers -> Engine    │  │ • JsonLinesDecoder       │                  │
│  │ • IdStrategy             │  └──────────────────────────┘                  │
│  └──────────────────────────┘                                                │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── RELATIONSHIPS ────────────────────────────────┐
│                                                                              │
│  Ingestor ──walks──> dir ──paths──> worker ──decodes──> Fields ──> Engine    │
│                                                                              │
│  Engine ──index()──> Analyzer ──tokens──> InvertedIndex ──> PostingList      │
│     │                                                                        │
│     └──find()──> QueryExecutor ──uses──> DocumentMatcher ──> FindResult      │
│                                                                              │
└──────────────────────────────────────────────────────────────────────────────┘
*/
