//! Per-record extraction of company authors and contact email.

use std::collections::HashSet;

use super::rules::is_company;
use crate::models::{NormalizedPaperRecord, RawAuthorEntry, RawPaperRecord};

/// Collect the names of company-affiliated authors and their distinct affiliations.
///
/// Returns `(non_academic_authors, company_affiliations)`. Authors without an
/// affiliation or without a name are skipped. Affiliations keep first-seen order.
pub fn extract_authors_affiliations(authors: &[RawAuthorEntry]) -> (Vec<String>, Vec<String>) {
    let mut names = Vec::new();
    let mut companies = Vec::new();
    let mut seen = HashSet::new();

    for author in authors {
        let name = author.name.trim();
        let Some(affiliation) = author.affiliation.as_deref().map(str::trim) else {
            continue;
        };
        if name.is_empty() || !is_company(Some(affiliation)) {
            continue;
        }

        names.push(name.to_string());
        if seen.insert(affiliation) {
            companies.push(affiliation.to_string());
        }
    }

    (names, companies)
}

/// Find the contact email for a paper.
///
/// Prefers the first author flagged as corresponding that has an email; otherwise
/// falls back to the first email listed on any author.
pub fn extract_corresponding_email(authors: &[RawAuthorEntry]) -> Option<String> {
    let email_of = |author: &RawAuthorEntry| {
        author
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    };

    authors
        .iter()
        .filter(|a| a.corresponding)
        .find_map(email_of)
        .or_else(|| authors.iter().find_map(email_of))
}

/// Reduce a raw record to its non-academic contributors.
pub fn normalize_record(record: &RawPaperRecord) -> NormalizedPaperRecord {
    let (non_academic_authors, company_affiliations) =
        extract_authors_affiliations(&record.authors);

    NormalizedPaperRecord {
        pubmed_id: record.pubmed_id.clone(),
        title: record.title.clone(),
        publication_date: record.publication_date.clone(),
        non_academic_authors,
        company_affiliations,
        corresponding_email: extract_corresponding_email(&record.authors),
    }
}
