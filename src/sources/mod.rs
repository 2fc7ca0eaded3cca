//! Paper metadata sources.
//!
//! A [`Source`] turns a [`SearchQuery`] into a [`FetchBatch`] of raw paper
//! records. [`PubMedSource`] talks to NCBI E-utilities; [`MockSource`] returns
//! fixed records for tests.

mod pubmed;

pub mod mock;

pub use mock::MockSource;
pub use pubmed::PubMedSource;

use crate::models::{FetchBatch, SearchQuery};
use async_trait::async_trait;

/// Interface for paper metadata sources.
///
/// A call either yields the whole batch or fails as a unit; articles that
/// cannot be read are reported in [`FetchBatch::malformed`] instead of failing
/// the call.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "pubmed")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch up to `query.max_results` records matching the query
    async fn fetch(&self, query: &SearchQuery) -> Result<FetchBatch, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (XML, JSON, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
