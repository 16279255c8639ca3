use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the final report: everything known about a store for the period.
///
/// The aggregator fills the summed columns, the enrichment step adds surface
/// and benchmark, and the KPI calculator fills the derived columns. Reference
/// and derived columns start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreAggregate {
    pub store_code: String,
    pub quantity: Decimal,
    /// Revenue excluding tax.
    pub revenue: Decimal,
    /// Sum of the known purchase costs of the store's lines.
    pub purchase_cost: Decimal,
    /// Lines whose barcode could not be priced against the catalog.
    pub unpriced_lines: usize,
    pub line_count: usize,

    pub surface: Decimal,
    pub benchmark_turnover: Decimal,

    /// Purchase cost after the fallback policy has been applied.
    pub purchase_price: Decimal,
    pub cost_fallback_applied: bool,
    pub profit: Decimal,
    pub margin_pct: Decimal,
    pub yield_per_area: Decimal,
    pub gap_pct: Decimal,
}

impl StoreAggregate {
    /// An empty aggregate for a store, before any line has been added.
    pub fn new(store_code: impl Into<String>) -> Self {
        Self {
            store_code: store_code.into(),
            quantity: Decimal::ZERO,
            revenue: Decimal::ZERO,
            purchase_cost: Decimal::ZERO,
            unpriced_lines: 0,
            line_count: 0,
            surface: Decimal::ZERO,
            benchmark_turnover: Decimal::ZERO,
            purchase_price: Decimal::ZERO,
            cost_fallback_applied: false,
            profit: Decimal::ZERO,
            margin_pct: Decimal::ZERO,
            yield_per_area: Decimal::ZERO,
            gap_pct: Decimal::ZERO,
        }
    }
}
