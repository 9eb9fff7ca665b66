use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};

pub const DEFAULT_START: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 20;

/// How the per-field match sets of a filter are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    #[serde(rename = "AND")]
    And,      // every filter field must match
    #[serde(rename = "OR")]
    Or,       // any filter field may match
    #[serde(rename = "PHRASE")]
    Phrase,   // every field must match, and its terms must be adjacent and in order
}

/// Sort order for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for MatchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(MatchType::And),
            "OR" => Ok(MatchType::Or),
            "PHRASE" => Ok(MatchType::Phrase),
            other => Err(Error::new(ErrorKind::InvalidArgument, format!("Unknown match type '{}'", other))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortOrder::Ascending),
            "descending" | "desc" => Ok(SortOrder::Descending),
            other => Err(Error::new(ErrorKind::InvalidArgument, format!("Unknown sort order '{}'", other))),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            MatchType::And => "AND",
            MatchType::Or => "OR",
            MatchType::Phrase => "PHRASE",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        })
    }
}

/// Caller-facing query options. Zero values mean "use the default" and are
/// only replaced when the query runs (see `resolve`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FindOptions {
    pub start: i64,
    pub limit: i64,
    pub match_type: Option<MatchType>,
    pub sort: Option<SortOrder>,
}

impl FindOptions {
    pub fn with_limit(limit: i64) -> Self {
        FindOptions { limit, ..FindOptions::default() }
    }

    pub fn start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = Some(match_type);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Options after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub start: i64,
    pub limit: i64,
    pub match_type: MatchType,
    pub sort: SortOrder,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        ResolvedOptions {
            start: DEFAULT_START,
            limit: DEFAULT_LIMIT,
            match_type: MatchType::And,
            sort: SortOrder::Descending,
        }
    }
}

impl ResolvedOptions {
    /// `limit <= 0` after resolution means the caller asked for a negative
    /// page size; entry points answer it with an empty result.
    pub fn is_empty_page(&self) -> bool {
        self.limit <= 0
    }
}

/// Applies defaults field by field: a `limit` of 0 becomes `default_limit`,
/// a negative `start` becomes 0 and unset enums take their defaults. A
/// negative `limit` is passed through untouched.
pub fn resolve(opts: Option<&FindOptions>, default_limit: i64) -> ResolvedOptions {
    let defaults = ResolvedOptions { limit: default_limit, ..ResolvedOptions::default() };

    let Some(opts) = opts else {
        return defaults;
    };

    ResolvedOptions {
        start: if opts.start < 0 { defaults.start } else { opts.start },
        limit: if opts.limit == 0 { defaults.limit } else { opts.limit },
        match_type: opts.match_type.unwrap_or(defaults.match_type),
        sort: opts.sort.unwrap_or(defaults.sort),
    }
}
