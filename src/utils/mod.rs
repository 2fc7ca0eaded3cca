//! Utility modules supporting retrieval.
//!
//! - [`HttpClient`]: shared reqwest client with the package user agent and a timeout

mod http;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
