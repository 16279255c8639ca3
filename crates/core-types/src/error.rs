use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Duplicate store code '{key}' in the {dataset} reference table")]
    DuplicateKey { dataset: String, key: String },
}
