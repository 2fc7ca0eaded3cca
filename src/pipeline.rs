//! One query run: fetch, classify, present.

use std::path::PathBuf;

use crate::classify::normalize_record;
use crate::models::{FetchBatch, MalformedRecord, NormalizedPaperRecord, SearchQuery};
use crate::output::{print_records, save_csv, ConsoleFormat, OutputError};
use crate::sources::{Source, SourceError};

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Records could not be retrieved
    #[error("Failed to retrieve papers: {0}")]
    Retrieval(#[from] SourceError),

    /// Results could not be written
    #[error("Failed to write results: {0}")]
    Output(#[from] OutputError),
}

/// Where the classified records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Console(ConsoleFormat),
    Csv(PathBuf),
}

/// Outcome of a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Classified records, in the order the source returned them
    pub records: Vec<NormalizedPaperRecord>,

    /// Articles skipped because they could not be read
    pub skipped: Vec<MalformedRecord>,
}

impl RunReport {
    /// Records with at least one company-affiliated author
    pub fn with_company_authors(&self) -> impl Iterator<Item = &NormalizedPaperRecord> {
        self.records.iter().filter(|r| r.has_company_affiliation())
    }
}

/// Classify every record of a batch, logging skipped articles
pub fn classify_batch(batch: FetchBatch) -> RunReport {
    for malformed in &batch.malformed {
        tracing::warn!("Skipping malformed record ({})", malformed);
    }

    let records = batch
        .records
        .iter()
        .map(|raw| {
            let record = normalize_record(raw);
            tracing::debug!(
                pmid = %record.pubmed_id,
                companies = record.company_affiliations.len(),
                "Processed {}",
                record.title
            );
            record
        })
        .collect();

    RunReport {
        records,
        skipped: batch.malformed,
    }
}

/// Fetch records for a query and classify them
pub async fn fetch_and_classify(
    source: &dyn Source,
    query: &SearchQuery,
) -> Result<RunReport, SourceError> {
    tracing::debug!(
        source = source.id(),
        query = %query.query,
        max_results = query.max_results,
        "Querying {}",
        source.name()
    );

    let batch = source.fetch(query).await?;
    if batch.is_empty() {
        tracing::debug!(query = %query.query, "No papers found");
    }

    Ok(classify_batch(batch))
}

/// Run a query end to end and write the results to `destination`
pub async fn run(
    source: &dyn Source,
    query: &SearchQuery,
    destination: &Destination,
    separator: &str,
) -> Result<RunReport, PipelineError> {
    let report = fetch_and_classify(source, query).await?;

    match destination {
        Destination::Console(format) => print_records(&report.records, *format, separator)?,
        Destination::Csv(path) => save_csv(path, &report.records, separator)?,
    }

    Ok(report)
}
