//! Paper records as retrieved from a source and after affiliation classification.

use serde::{Deserialize, Serialize};

/// One author entry of a retrieved paper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuthorEntry {
    /// Display name ("ForeName LastName" or a collective name)
    pub name: String,

    /// Free-text institutional description
    pub affiliation: Option<String>,

    /// Contact email, if the source exposes one
    pub email: Option<String>,

    /// Whether the source marks this author as the corresponding author
    #[serde(default)]
    pub corresponding: bool,
}

impl RawAuthorEntry {
    /// Create an author with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the affiliation
    pub fn affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    /// Set the email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Mark as corresponding author
    pub fn corresponding(mut self, corresponding: bool) -> Self {
        self.corresponding = corresponding;
        self
    }
}

/// A paper as produced by a [`Source`](crate::sources::Source), before classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPaperRecord {
    /// PubMed identifier
    pub pubmed_id: String,

    /// Article title
    pub title: String,

    /// Publication date as given by the source (usually a year)
    pub publication_date: String,

    /// Authors in the order listed by the source
    pub authors: Vec<RawAuthorEntry>,
}

impl RawPaperRecord {
    /// Create a record with no authors
    pub fn new(
        pubmed_id: impl Into<String>,
        title: impl Into<String>,
        publication_date: impl Into<String>,
    ) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            title: title.into(),
            publication_date: publication_date.into(),
            authors: Vec::new(),
        }
    }

    /// Append an author
    pub fn author(mut self, author: RawAuthorEntry) -> Self {
        self.authors.push(author);
        self
    }
}

/// A paper reduced to its non-academic contributors.
///
/// Built by [`normalize_record`](crate::classify::normalize_record) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPaperRecord {
    pub pubmed_id: String,
    pub title: String,
    pub publication_date: String,

    /// Names of authors whose affiliation classified as a company
    pub non_academic_authors: Vec<String>,

    /// Distinct company affiliation strings, in first-seen order
    pub company_affiliations: Vec<String>,

    pub corresponding_email: Option<String>,
}

impl NormalizedPaperRecord {
    /// Whether any author on this paper has a company affiliation
    pub fn has_company_affiliation(&self) -> bool {
        !self.company_affiliations.is_empty()
    }
}

/// A retrieved article that lacked the structure needed to build a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    /// PubMed identifier, when one could be read
    pub pubmed_id: Option<String>,

    /// What was missing or unreadable
    pub reason: String,
}

impl MalformedRecord {
    /// Create a record of a skipped article
    pub fn new(pubmed_id: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            pubmed_id,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pubmed_id {
            Some(id) => write!(f, "PMID {}: {}", id, self.reason),
            None => write!(f, "unknown PMID: {}", self.reason),
        }
    }
}
