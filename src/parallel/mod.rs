pub mod id;
pub mod indexer;

pub use id::IdStrategy;
pub use indexer::{IngestReport, Ingestor};
