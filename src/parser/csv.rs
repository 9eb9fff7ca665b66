use std::io::Read;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{FieldValue, Fields};
use crate::parser::{DecodeSummary, RecordDecoder};

/// CSV rows keyed by the header row. Every value is kept as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDecoder;

impl CsvDecoder {
    pub fn new() -> Self {
        CsvDecoder
    }
}

/// Removes escaped and bare double quotes, trims, and drops one leading `:`.
pub fn clean_cell(s: &str) -> String {
    let s = s.replace("\\\"", "").replace('"', "");
    let s = s.trim();
    s.strip_prefix(':').unwrap_or(s).to_string()
}

impl RecordDecoder for CsvDecoder {
    fn extensions(&self) -> &[&'static str] {
        &["csv"]
    }

    fn decode(&self, reader: &mut dyn Read, sink: &mut dyn FnMut(Fields)) -> Result<DecodeSummary> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(clean_cell).collect();
        if headers.is_empty() {
            return Err(Error::new(ErrorKind::Parse, "CSV input has no header row".to_string()));
        }

        let mut summary = DecodeSummary::default();
        for record in rdr.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    // A malformed record ends the stream; rows before it are kept
                    tracing::warn!(target: "sage::ingest", error = %err, rows = summary.rows, "stopping at malformed CSV record");
                    summary.failed_rows += 1;
                    break;
                }
            };

            let row: Fields = headers.iter()
                .enumerate()
                .map(|(i, key)| {
                    let value = record.get(i).map(clean_cell).unwrap_or_default();
                    (key.clone(), FieldValue::Text(value))
                })
                .collect();

            sink(row);
            summary.rows += 1;
        }

        Ok(summary)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
