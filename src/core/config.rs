use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::core::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sort_field: String,         // numeric field `find` orders by
    pub default_limit: i64,         // page size when a query leaves limit at 0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub dirs: Vec<PathBuf>,
    pub workers: usize,             // 0 = one per CPU
    pub queue_capacity: usize,      // pending file paths before the walker blocks
    pub row_buffer: usize,          // 0 = decode and index on the same thread
    pub id_field: String,
    pub timestamp_suffix: bool,     // append `_<unix nanos>` to ids taken from `id_field`
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sort_field: "Timestamp".to_string(),
            default_limit: 20,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            dirs: vec![PathBuf::from("storage/upload")],
            workers: 10,
            queue_capacity: 10,
            row_buffer: 0,
            id_field: "MsgId".to_string(),
            timestamp_suffix: false,
        }
    }
}

impl IngestConfig {
    /// Settings for columnar sources: fewer file workers, each with a
    /// decode stage feeding an index stage through a 1000-row buffer.
    pub fn columnar() -> Self {
        IngestConfig {
            workers: 4,
            row_buffer: 1000,
            timestamp_suffix: true,
            ..IngestConfig::default()
        }
    }

    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
