use chrono::Utc;
use uuid::Uuid;
use crate::core::config::IngestConfig;
use crate::core::types::{DocId, Fields};

/// How a decoded row gets its document id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdStrategy {
    pub field: Option<String>,
    pub timestamp_suffix: bool,
}

impl IdStrategy {
    pub fn from_config(config: &IngestConfig) -> Self {
        IdStrategy {
            field: Some(config.id_field.clone()).filter(|f| !f.is_empty()),
            timestamp_suffix: config.timestamp_suffix,
        }
    }

    /// The row's identifying field when present and non-empty, optionally
    /// suffixed with `_<unix nanos>` so re-ingesting the same source does not
    /// collide; a fresh UUID v4 otherwise.
    pub fn derive(&self, row: &Fields) -> DocId {
        let from_field = self.field.as_ref()
            .and_then(|field| row.get(field))
            .map(|value| value.to_string())
            .filter(|id| !id.is_empty());

        match from_field {
            Some(id) if self.timestamp_suffix => {
                let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
                DocId(format!("{}_{}", id, nanos))
            }
            Some(id) => DocId(id),
            None => DocId(Uuid::new_v4().to_string()),
        }
    }
}

impl Default for IdStrategy {
    fn default() -> Self {
        IdStrategy::from_config(&IngestConfig::default())
    }
}
