//! Affiliation classification.
//!
//! Decides which authors of a paper are affiliated with a company rather than an
//! academic or clinical institution, using a static keyword rule table:
//!
//! - [`is_company`] / [`classify_affiliation`]: classify one affiliation string
//! - [`extract_authors_affiliations`]: company authors and their distinct affiliations
//! - [`extract_corresponding_email`]: contact email for the paper
//! - [`normalize_record`]: all of the above for one [`RawPaperRecord`](crate::models::RawPaperRecord)
//!
//! ```rust
//! use papers_fetcher::classify::is_company;
//!
//! assert!(is_company(Some("Genentech Inc., South San Francisco")));
//! assert!(!is_company(Some("Pfizer Inc. and Stanford University School of Medicine")));
//! assert!(!is_company(None));
//! ```

mod extract;
mod rules;

pub use extract::{extract_authors_affiliations, extract_corresponding_email, normalize_record};
pub use rules::{classify_affiliation, is_company, AffiliationKind};
