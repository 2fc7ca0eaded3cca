//! Search request and retrieval batch models.

use serde::{Deserialize, Serialize};

use super::{MalformedRecord, RawPaperRecord};

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Main search query string (PubMed query syntax)
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: 10,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

/// Everything a source returned for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchBatch {
    /// Well-formed records, in the order the source ranked them
    pub records: Vec<RawPaperRecord>,

    /// Articles that were skipped because they could not be read
    pub malformed: Vec<MalformedRecord>,
}

impl FetchBatch {
    /// Create a batch with no malformed entries
    pub fn new(records: Vec<RawPaperRecord>) -> Self {
        Self {
            records,
            malformed: Vec::new(),
        }
    }

    /// Create an empty batch (query matched nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the batch has no usable records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
