//! # Storeperf Core Types
//!
//! The shared vocabulary of the monthly store performance pipeline. Every other
//! crate speaks in these types: raw sale lines as they come out of the
//! point-of-sale database, priced transaction records, per-store aggregates and
//! the reference tables joined onto them.
//!
//! This crate holds no I/O. The few rules that belong to the data itself live
//! here too, so they can be tested without a database: store-code
//! normalization, the sales filter, catalog tie-breaking and decimal rounding.

pub mod catalog;
pub mod enums;
pub mod error;
pub mod money;
pub mod period;
pub mod reference;
pub mod sales;
pub mod store;

// Re-export the core types to provide a clean public API.
pub use catalog::{CatalogEntry, ProductCatalog};
pub use enums::{ReferenceField, SortKey};
pub use error::CoreError;
pub use period::ReportPeriod;
pub use reference::ReferenceTable;
pub use sales::{check_label, normalize_store_code, RawSale, SalesQuery, TransactionRecord};
pub use store::StoreAggregate;
