//! # Storeperf Analytics Engine
//!
//! Turns priced sale lines into the per-store KPI table of the monthly report.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** no I/O. Depends only on `core-types`.
//! - **Explicit Policies:** every fallback and every guarded ratio is a named
//!   function in `kpi`, so each edge case can be tested on its own.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: aggregation, reference joins and KPI derivation.
//! - `StoreReport`: the ranked final table, its totals and its top-N summary.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod kpi;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, EngineOutput};
pub use enrich::JoinStats;
pub use error::AnalyticsError;
pub use kpi::KpiPolicy;
pub use report::{ReportSummary, StoreReport, Totals};
