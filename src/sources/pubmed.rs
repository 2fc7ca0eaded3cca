//! PubMed research source implementation using E-utilities API.

use async_trait::async_trait;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::PubMedConfig;
use crate::models::{FetchBatch, MalformedRecord, RawAuthorEntry, RawPaperRecord, SearchQuery};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// PubMed research source
///
/// Uses NCBI E-utilities: one `esearch` call for the PMIDs, then one batched
/// `efetch` call for the article XML.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    config: PubMedConfig,
}

impl PubMedSource {
    /// Create a new PubMed source
    pub fn new(config: PubMedConfig) -> Result<Self, SourceError> {
        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>, config: PubMedConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), name)
    }

    /// Parameters sent with every request
    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("retmode", "xml".to_string()),
            ("tool", self.config.tool.clone()),
        ];
        if let Some(email) = &self.config.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    fn encode(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build E-utilities search URL
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let mut params = self.common_params();
        params.push(("term", query.query.clone()));
        params.push(("retmax", query.max_results.to_string()));

        format!("{}?{}", self.endpoint("esearch.fcgi"), Self::encode(&params))
    }

    /// Build E-utilities fetch URL for specific PubMed IDs
    fn build_fetch_url(&self, ids: &[String]) -> String {
        let mut params = self.common_params();
        params.push(("id", ids.join(",")));

        format!("{}?{}", self.endpoint("efetch.fcgi"), Self::encode(&params))
    }

    /// Parse E-utilities search response XML
    fn parse_search_response(xml: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct ESearchResult {
            #[serde(default)]
            IdList: Option<IdList>,
            #[serde(rename = "ERROR", default)]
            error: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct IdList {
            #[serde(rename = "Id", default)]
            ids: Vec<String>,
        }

        let result: ESearchResult = from_str(xml)
            .map_err(|e| SourceError::Parse(format!("Failed to parse PubMed search XML: {}", e)))?;

        let ids = result.IdList.map(|list| list.ids).unwrap_or_default();
        match result.error {
            Some(error) if ids.is_empty() => Err(SourceError::Api(format!(
                "PubMed search failed: {}",
                error
            ))),
            _ => Ok(ids),
        }
    }

    /// Parse E-utilities fetch response XML.
    ///
    /// Read event by event so that inline markup in titles and affiliations
    /// (`<i>`, `<sup>`, `<sub>`) and book entries interleaved with articles do
    /// not fail the whole document.
    fn parse_fetch_response(xml: &str) -> Result<FetchBatch, SourceError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        let mut parser = ArticleSetParser::default();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    parser.open(String::from_utf8_lossy(e.name().as_ref()).into_owned())?
                }
                Ok(Event::End(_)) => parser.close(),
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    parser.text(&text);
                }
                Ok(Event::CData(e)) => parser.text(&String::from_utf8_lossy(&e)),
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(SourceError::Parse(format!(
                        "Failed to parse PubMed fetch XML at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        parser.finish()
    }
}

/// Elements whose text content is collected, inline markup included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    Year,
    MedlineDate,
    LastName,
    ForeName,
    CollectiveName,
    Affiliation,
    ElectronicAddress,
}

#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Debug, Default)]
struct ArticleDraft {
    has_citation: bool,
    has_article: bool,
    pmid: Option<String>,
    title: Option<String>,
    year: Option<String>,
    medline_date: Option<String>,
    authors: Vec<AuthorDraft>,
}

#[derive(Debug, Default)]
struct AuthorDraft {
    last_name: Option<String>,
    fore_name: Option<String>,
    collective_name: Option<String>,
    affiliations: Vec<String>,
    electronic_address: Option<String>,
}

/// Streaming state for a `PubmedArticleSet` document
#[derive(Debug, Default)]
struct ArticleSetParser {
    path: Vec<String>,
    saw_root: bool,
    article: Option<ArticleDraft>,
    capture: Option<Capture>,
    batch: FetchBatch,
}

impl ArticleSetParser {
    /// Whether the innermost open elements are exactly `ancestors`, outermost first
    fn under(&self, ancestors: &[&str]) -> bool {
        self.path.len() >= ancestors.len()
            && self.path[self.path.len() - ancestors.len()..]
                .iter()
                .zip(ancestors)
                .all(|(open, name)| open.as_str() == *name)
    }

    fn open(&mut self, name: String) -> Result<(), SourceError> {
        if self.capture.is_some() {
            // inline markup inside a collected element
            self.path.push(name);
            return Ok(());
        }

        if self.path.is_empty() {
            if name != "PubmedArticleSet" {
                return Err(SourceError::Parse(format!(
                    "Unexpected root element <{}> in PubMed fetch XML",
                    name
                )));
            }
            self.saw_root = true;
        } else if self.path.len() == 1 {
            if name == "PubmedArticle" {
                self.article = Some(ArticleDraft::default());
            } else {
                tracing::debug!(element = %name, "Skipping non-article entry");
            }
        } else if self.article.is_some() {
            let field = self.field_for(&name);
            let citation = name == "MedlineCitation" && self.path.len() == 2;
            let body = name == "Article" && self.under(&["PubmedArticle", "MedlineCitation"]);
            let author = name == "Author" && self.under(&["MedlineCitation", "Article", "AuthorList"]);

            if let Some(article) = self.article.as_mut() {
                article.has_citation |= citation;
                article.has_article |= body;
                if author {
                    article.authors.push(AuthorDraft::default());
                }
            }
            if let Some(field) = field {
                self.capture = Some(Capture {
                    field,
                    depth: self.path.len() + 1,
                    text: String::new(),
                });
            }
        }

        self.path.push(name);
        Ok(())
    }

    /// Field collected by element `name` opened at the current position
    fn field_for(&self, name: &str) -> Option<Field> {
        const AUTHOR: &[&str] = &["MedlineCitation", "Article", "AuthorList", "Author"];

        let field = match name {
            "PMID" if self.under(&["PubmedArticle", "MedlineCitation"]) => Field::Pmid,
            "ArticleTitle" if self.under(&["MedlineCitation", "Article"]) => Field::Title,
            "Year" if self.under(&["Article", "Journal", "JournalIssue", "PubDate"]) => Field::Year,
            "MedlineDate" if self.under(&["Article", "Journal", "JournalIssue", "PubDate"]) => {
                Field::MedlineDate
            }
            "LastName" if self.under(AUTHOR) => Field::LastName,
            "ForeName" if self.under(AUTHOR) => Field::ForeName,
            "CollectiveName" if self.under(AUTHOR) => Field::CollectiveName,
            "ElectronicAddress" if self.under(AUTHOR) => Field::ElectronicAddress,
            "Affiliation" if self.under(&["Article", "AuthorList", "Author", "AffiliationInfo"]) => {
                Field::Affiliation
            }
            _ => return None,
        };
        Some(field)
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn close(&mut self) {
        let depth = self.path.len();
        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(capture) = self.capture.take() {
                self.store(capture.field, collapse_whitespace(&capture.text));
            }
        }

        let name = self.path.pop();
        if depth == 2 && name.as_deref() == Some("PubmedArticle") {
            if let Some(article) = self.article.take() {
                self.finish_article(article);
            }
        }
    }

    fn store(&mut self, field: Field, value: Option<String>) {
        let Some(article) = self.article.as_mut() else {
            return;
        };
        let Some(value) = value else {
            return;
        };

        let author = article.authors.last_mut();
        match (field, author) {
            (Field::Pmid, _) => article.pmid = Some(value),
            (Field::Title, _) => article.title = Some(value),
            (Field::Year, _) => article.year = Some(value),
            (Field::MedlineDate, _) => article.medline_date = Some(value),
            (Field::LastName, Some(author)) => author.last_name = Some(value),
            (Field::ForeName, Some(author)) => author.fore_name = Some(value),
            (Field::CollectiveName, Some(author)) => author.collective_name = Some(value),
            (Field::Affiliation, Some(author)) => author.affiliations.push(value),
            (Field::ElectronicAddress, Some(author)) => author.electronic_address = Some(value),
            (_, None) => {}
        }
    }

    fn finish_article(&mut self, article: ArticleDraft) {
        if !article.has_citation {
            self.batch
                .malformed
                .push(MalformedRecord::new(None, "missing MedlineCitation"));
            return;
        }
        let Some(pmid) = article.pmid else {
            self.batch.malformed.push(MalformedRecord::new(None, "missing PMID"));
            return;
        };
        if !article.has_article {
            self.batch
                .malformed
                .push(MalformedRecord::new(Some(pmid), "missing Article"));
            return;
        }
        let Some(title) = article.title else {
            self.batch
                .malformed
                .push(MalformedRecord::new(Some(pmid), "missing ArticleTitle"));
            return;
        };

        let publication_date = article.year.or(article.medline_date).unwrap_or_default();
        let mut record = RawPaperRecord::new(pmid, title, publication_date);

        for author in article.authors {
            let name = match author.collective_name {
                Some(collective) => collective,
                None => {
                    let first = author.fore_name.unwrap_or_default();
                    let last = author.last_name.unwrap_or_default();
                    format!("{} {}", first, last).trim().to_string()
                }
            };
            if name.is_empty() {
                continue;
            }

            let affiliation = author.affiliations.into_iter().next();
            let explicit_email = author.electronic_address;

            let corresponding = explicit_email.is_some()
                || affiliation
                    .as_deref()
                    .map(marks_corresponding)
                    .unwrap_or(false);
            let email = explicit_email.or_else(|| affiliation.as_deref().and_then(find_email));

            record.authors.push(RawAuthorEntry {
                name,
                affiliation,
                email,
                corresponding,
            });
        }

        self.batch.records.push(record);
    }

    fn finish(self) -> Result<FetchBatch, SourceError> {
        if !self.saw_root {
            return Err(SourceError::Parse(
                "PubMed fetch XML has no PubmedArticleSet element".to_string(),
            ));
        }
        if !self.path.is_empty() {
            return Err(SourceError::Parse(format!(
                "PubMed fetch XML ended inside <{}>",
                self.path.join("/")
            )));
        }
        Ok(self.batch)
    }
}

/// Trim and collapse runs of whitespace; `None` when nothing is left
fn collapse_whitespace(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// PubMed appends "Electronic address: ..." to the corresponding author's affiliation
fn marks_corresponding(affiliation: &str) -> bool {
    let lower = affiliation.to_lowercase();
    lower.contains("electronic address") || lower.contains("corresponding author")
}

fn find_email(text: &str) -> Option<String> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
    });
    re.find(text).map(|m| m.as_str().to_string())
}

#[async_trait]
impl Source for PubMedSource {
    fn id(&self) -> &str {
        "pubmed"
    }

    fn name(&self) -> &str {
        "PubMed"
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<FetchBatch, SourceError> {
        if query.query.trim().is_empty() {
            return Err(SourceError::InvalidRequest("empty query".to_string()));
        }
        if query.max_results == 0 {
            return Err(SourceError::InvalidRequest(
                "max_results must be positive".to_string(),
            ));
        }

        let search_url = self.build_search_url(query);
        tracing::debug!(url = %search_url, "PubMed esearch");

        let xml = self.client.get_text(&search_url).await.map_err(|e| match e {
            SourceError::Network(msg) => {
                SourceError::Network(format!("Failed to search PubMed: {}", msg))
            }
            other => other,
        })?;

        let ids = Self::parse_search_response(&xml)?;
        tracing::debug!(count = ids.len(), query = %query.query, "PubMed esearch returned PMIDs");

        if ids.is_empty() {
            return Ok(FetchBatch::empty());
        }

        let fetch_url = self.build_fetch_url(&ids);
        tracing::debug!(url = %fetch_url, "PubMed efetch");

        let fetch_xml = self.client.get_text(&fetch_url).await.map_err(|e| match e {
            SourceError::Network(msg) => {
                SourceError::Network(format!("Failed to fetch PubMed details: {}", msg))
            }
            other => other,
        })?;

        Self::parse_fetch_response(&fetch_xml)
    }
}
