//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{FetchBatch, RawAuthorEntry, RawPaperRecord, SearchQuery};
use crate::sources::{Source, SourceError};

/// A mock source for testing that returns predefined records.
///
/// Records are returned in order, truncated to the query's `max_results`.
#[derive(Debug, Default)]
pub struct MockSource {
    batch: Mutex<FetchBatch>,
    failure: Mutex<Option<String>>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl MockSource {
    /// Create a new mock source with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source returning the given records.
    pub fn with_records(records: Vec<RawPaperRecord>) -> Self {
        let source = Self::new();
        source.set_batch(FetchBatch::new(records));
        source
    }

    /// Set the batch to return.
    pub fn set_batch(&self, batch: FetchBatch) {
        *self.batch.lock().unwrap() = batch;
    }

    /// Make every fetch fail with a network error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<FetchBatch, SourceError> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SourceError::Network(message));
        }

        let mut batch = self.batch.lock().unwrap().clone();
        batch.records.truncate(query.max_results);
        Ok(batch)
    }
}

/// Helper function to create a mock record whose authors are `(name, affiliation)` pairs.
pub fn make_record(pubmed_id: &str, title: &str, authors: &[(&str, &str)]) -> RawPaperRecord {
    authors.iter().fold(
        RawPaperRecord::new(pubmed_id, title, "2024"),
        |record, (name, affiliation)| {
            record.author(RawAuthorEntry::new(*name).affiliation(*affiliation))
        },
    )
}
