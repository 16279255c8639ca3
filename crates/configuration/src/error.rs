use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read the report configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid report configuration: {0}")]
    ValidationError(String),

    /// A value rejected by the domain rules (report period, filter labels).
    #[error("Invalid report configuration value: {0}")]
    InvalidValue(#[from] CoreError),
}
