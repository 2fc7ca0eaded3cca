//! # Papers Fetcher
//!
//! Fetch papers from PubMed and find the authors affiliated with pharmaceutical
//! or biotech companies.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Raw and classified paper records, search queries
//! - [`sources`]: Paper metadata sources (PubMed E-utilities, mock)
//! - [`classify`]: Affiliation heuristic and per-record extraction
//! - [`output`]: Console rendering and CSV export
//! - [`pipeline`]: One query run from fetch to output
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management

pub mod classify;
pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use classify::{is_company, normalize_record};
pub use models::{NormalizedPaperRecord, RawAuthorEntry, RawPaperRecord};
pub use sources::{PubMedSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
