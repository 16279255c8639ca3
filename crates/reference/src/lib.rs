//! # Storeperf Reference Data
//!
//! Loads the two reference datasets joined onto the store aggregates: floor
//! area per store and benchmark turnover per store. Both are flat CSV files
//! keyed by store code and both are optional.

pub mod error;
pub mod loader;

pub use error::ReferenceError;
pub use loader::{load_or_default, load_reference, read_reference};
