use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Failed to write summary document: {0}")]
    Document(String),
}
