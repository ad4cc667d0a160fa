//! Ingest adapters
//!
//! Supplies the core with its inputs:
//! - Raw EDA recordings (two-column CSV)
//! - Per-run tag sources discovered from a directory hierarchy

mod csv_import;
mod discovery;

pub use csv_import::{CsvReadResult, RawCsvReader};
pub use discovery::{discover_runs, RunDiscovery};

use crate::error::EdaError;

/// Errors that can occur while reading recordings and runs
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Samples out of order at line {line}: {timestamp} follows {previous}")]
    Unordered {
        line: usize,
        timestamp: i64,
        previous: i64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error(transparent)]
    Eda(#[from] EdaError),
}
