use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid KPI policy: {0}")]
    InvalidPolicy(String),

    #[error("Expected the {expected} reference table, got the {found} one")]
    DatasetMismatch { expected: String, found: String },
}
