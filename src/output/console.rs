//! Console rendering of classified papers.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use super::{OutputError, NOT_AVAILABLE};
use crate::models::NormalizedPaperRecord;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// Table format (human-readable)
    Table,
    /// One labelled block per paper
    Plain,
    /// JSON array (machine-readable)
    Json,
}

fn join_or_na(values: &[String], separator: &str) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(separator)
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Render records for the console
pub fn render_console(
    records: &[NormalizedPaperRecord],
    format: ConsoleFormat,
    separator: &str,
) -> Result<String, OutputError> {
    match format {
        ConsoleFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        ConsoleFormat::Plain => {
            let blocks: Vec<String> = records
                .iter()
                .map(|r| {
                    format!(
                        "PubmedID: {}\nTitle: {}\nPublication Date: {}\nNon-academic Author(s): {}\nCompany Affiliation(s): {}\nCorresponding Author Email: {}\n",
                        r.pubmed_id,
                        r.title,
                        or_na(Some(r.publication_date.as_str())),
                        join_or_na(&r.non_academic_authors, separator),
                        join_or_na(&r.company_affiliations, separator),
                        or_na(r.corresponding_email.as_deref()),
                    )
                })
                .collect();
            Ok(blocks.join("\n"))
        }
        ConsoleFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(presets::UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "PMID",
                    "Title",
                    "Date",
                    "Non-academic Author(s)",
                    "Company Affiliation(s)",
                    "Email",
                ]);

            for r in records {
                table.add_row(vec![
                    Cell::new(&r.pubmed_id),
                    Cell::new(&r.title).add_attribute(Attribute::Bold),
                    Cell::new(or_na(Some(r.publication_date.as_str()))),
                    Cell::new(join_or_na(&r.non_academic_authors, "\n")),
                    Cell::new(join_or_na(&r.company_affiliations, "\n")),
                    Cell::new(or_na(r.corresponding_email.as_deref())),
                ]);
            }
            Ok(table.to_string())
        }
    }
}

/// Print records to stdout
pub fn print_records(
    records: &[NormalizedPaperRecord],
    format: ConsoleFormat,
    separator: &str,
) -> Result<(), OutputError> {
    if records.is_empty() && format != ConsoleFormat::Json {
        println!("No papers found.");
        return Ok(());
    }

    println!("{}", render_console(records, format, separator)?);
    Ok(())
}
