use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read the workbook: {0}")]
    Unreadable(#[from] calamine::Error),

    #[error("Could not read the CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("No sheets found in the workbook")]
    NoSheets,

    #[error(
        "No valid data found in any sheet. Check that each sheet has the expected headers in row 2"
    )]
    NoValidData { skipped: Vec<String> },
}

pub type Result<T> = std::result::Result<T, IngestError>;
