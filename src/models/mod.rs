//! Core data models for retrieved and classified papers.

mod paper;
mod search;

pub use paper::{MalformedRecord, NormalizedPaperRecord, RawAuthorEntry, RawPaperRecord};
pub use search::{FetchBatch, SearchQuery};
