//! CSV export of classified papers.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::OutputError;
use crate::models::NormalizedPaperRecord;

/// Header row of exported files, in column order
pub const CSV_HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One exported row. List columns are joined with the configured separator;
/// absent values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Publication Date")]
    pub publication_date: String,

    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,

    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,

    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl CsvRow {
    pub fn from_record(record: &NormalizedPaperRecord, separator: &str) -> Self {
        Self {
            pubmed_id: record.pubmed_id.clone(),
            title: record.title.clone(),
            publication_date: record.publication_date.clone(),
            non_academic_authors: record.non_academic_authors.join(separator),
            company_affiliations: record.company_affiliations.join(separator),
            corresponding_email: record.corresponding_email.clone().unwrap_or_default(),
        }
    }
}

/// Write records as CSV. The header row is always written, even for no records.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[NormalizedPaperRecord],
    separator: &str,
) -> Result<(), OutputError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;
    for record in records {
        wtr.serialize(CsvRow::from_record(record, separator))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write records to it as CSV
pub fn save_csv(
    path: &Path,
    records: &[NormalizedPaperRecord],
    separator: &str,
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    write_csv(file, records, separator)?;

    tracing::info!(path = %path.display(), rows = records.len(), "Results saved");
    Ok(())
}

/// Parse CSV produced by [`write_csv`]
pub fn read_csv_from<R: Read>(reader: R) -> Result<Vec<CsvRow>, OutputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Read a CSV file produced by [`save_csv`]
pub fn read_csv(path: &Path) -> Result<Vec<CsvRow>, OutputError> {
    read_csv_from(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, companies: &[&str], email: Option<&str>) -> NormalizedPaperRecord {
        NormalizedPaperRecord {
            pubmed_id: id.to_string(),
            title: title.to_string(),
            publication_date: "2024".to_string(),
            non_academic_authors: companies.iter().map(|_| "Jane Doe".to_string()).collect(),
            company_affiliations: companies.iter().map(|c| c.to_string()).collect(),
            corresponding_email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_header_written_for_empty_output() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[], "; ").unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.trim_end(),
            "PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email"
        );
    }

    #[test]
    fn test_fields_are_quoted() {
        let records = vec![record(
            "1",
            "Insulin, \"smart\" pumps\nand sensors",
            &["Acme Pharma Inc., Boston"],
            None,
        )];

        let mut buf = Vec::new();
        write_csv(&mut buf, &records, "; ").unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("\"Insulin, \"\"smart\"\" pumps\nand sensors\""));
        assert!(text.contains("\"Acme Pharma Inc., Boston\""));
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            record("1", "First", &["Acme Pharma Inc., Boston", "Bayer AG"], Some("a@acme.example")),
            record("2", "Second, with comma", &[], None),
            record("3", "Third \"quoted\"", &["Genentech Inc."], None),
        ];

        let mut buf = Vec::new();
        write_csv(&mut buf, &records, "; ").unwrap();
        let rows = read_csv_from(buf.as_slice()).unwrap();

        assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row, &CsvRow::from_record(record, "; "));
        }
        assert_eq!(rows[0].company_affiliations, "Acme Pharma Inc., Boston; Bayer AG");
        assert_eq!(rows[1].corresponding_email, "");
        assert_eq!(rows[2].title, "Third \"quoted\"");
    }
}
