//! Row decoders. Each turns a byte stream into flat `Fields` records; the
//! ingestion coordinator picks one by file extension.

pub mod csv;
pub mod json_lines;

use std::io::Read;
use crate::core::error::Result;
use crate::core::types::Fields;

/// Outcome of decoding one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub rows: usize,          // rows handed to the sink
    pub failed_rows: usize,   // rows that could not be decoded and were skipped
}

pub trait RecordDecoder: Send + Sync {
    /// Lowercase file extensions without the dot, e.g. `["csv"]`.
    fn extensions(&self) -> &[&'static str];

    /// Decodes `reader`, calling `sink` once per row. An error means the
    /// stream as a whole was unusable (unreadable, no header); bad individual
    /// rows are counted in the summary instead.
    fn decode(&self, reader: &mut dyn Read, sink: &mut dyn FnMut(Fields)) -> Result<DecodeSummary>;

    fn name(&self) -> &str;
}

pub use self::csv::CsvDecoder;
pub use self::json_lines::JsonLinesDecoder;
