//! # Storeperf Database Crate
//!
//! The read-only gateway to the point-of-sale database the monthly report is
//! built from.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** all SQL lives here. The rest of the application sees the
//!   `TransactionSource` trait and the priced `TransactionRecord`s it yields.
//! - **Parameterized Queries:** dates, sale types and excluded families are
//!   bound as parameters, never interpolated into query text.
//! - **Bounded Startup:** `connect` retries a readiness probe with a fixed
//!   interval and gives up after a fixed number of attempts.
//!
//! ## Public API
//!
//! - `connect` / `RetryPolicy`: obtain a pool that is known to be ready.
//! - `DbRepository`: the `TransactionSource` backed by PostgreSQL.
//! - `extract`: the Extractor stage, from query to priced records.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod extract;
pub mod repository;
pub mod source;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, retry, PoolSettings, RetryPolicy};
pub use error::DbError;
pub use extract::{extract, price_lines};
pub use repository::DbRepository;
pub use source::TransactionSource;
