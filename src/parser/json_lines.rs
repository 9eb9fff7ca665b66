use std::io::{BufRead, BufReader, Read};
use serde_json::{Map, Value};
use crate::core::error::Result;
use crate::core::types::{FieldValue, Fields};
use crate::parser::{DecodeSummary, RecordDecoder};

/// One JSON object per line. Scalars are kept with their type; null and
/// nested values are skipped since the engine only stores flat records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesDecoder;

impl JsonLinesDecoder {
    pub fn new() -> Self {
        JsonLinesDecoder
    }
}

pub fn flatten_object(object: Map<String, Value>) -> Fields {
    let mut fields = Fields::with_capacity(object.len());
    for (key, value) in object {
        let scalar = match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::Text(n.to_string()),
            },
            other => {
                tracing::debug!(target: "sage::ingest", field = %key, kind = value_kind(&other), "skipping non-scalar value");
                continue;
            }
        };
        fields.insert(key, scalar);
    }
    fields
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "scalar",
    }
}

impl RecordDecoder for JsonLinesDecoder {
    fn extensions(&self) -> &[&'static str] {
        &["jsonl", "ndjson"]
    }

    fn decode(&self, reader: &mut dyn Read, sink: &mut dyn FnMut(Fields)) -> Result<DecodeSummary> {
        let mut summary = DecodeSummary::default();

        for (line_no, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(object)) => {
                    sink(flatten_object(object));
                    summary.rows += 1;
                }
                Ok(_) => {
                    tracing::warn!(target: "sage::ingest", line = line_no + 1, "skipping JSON line that is not an object");
                    summary.failed_rows += 1;
                }
                Err(err) => {
                    tracing::warn!(target: "sage::ingest", line = line_no + 1, error = %err, "skipping malformed JSON line");
                    summary.failed_rows += 1;
                }
            }
        }

        Ok(summary)
    }

    fn name(&self) -> &str {
        "json_lines"
    }
}
