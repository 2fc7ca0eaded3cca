//! Presentation of classified papers.
//!
//! - [`render_console`] / [`print_records`]: table, plain listing or JSON on stdout
//! - [`save_csv`] / [`write_csv`]: CSV export with a header row
//! - [`read_csv`]: read an exported file back into [`CsvRow`]s

mod console;
mod export;

pub use console::{print_records, render_console, ConsoleFormat};
pub use export::{read_csv, read_csv_from, save_csv, write_csv, CsvRow, CSV_HEADERS};

/// Errors that can occur while writing results
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// File could not be created or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Placeholder shown on the console for absent values
pub const NOT_AVAILABLE: &str = "N/A";
