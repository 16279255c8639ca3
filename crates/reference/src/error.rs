use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read reference file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed reference CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Reference file has no '{0}' column")]
    MissingColumn(String),

    #[error("Invalid value '{value}' for store '{store_code}' on line {line}")]
    InvalidValue {
        line: u64,
        store_code: String,
        value: String,
    },

    #[error(transparent)]
    DuplicateKey(#[from] CoreError),
}

impl ReferenceError {
    /// Whether the run may continue with default values.
    ///
    /// Only a duplicated store code is fatal: joining it would make the
    /// enriched figures depend on which row happened to win.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ReferenceError::DuplicateKey(_))
    }
}
