//! Row-wise KPI derivation.
//!
//! Every ratio here is a guarded division: an invalid denominator yields 0,
//! never a null or a non-finite value. Each policy is its own function.

use crate::error::AnalyticsError;
use core_types::money::round2;
use core_types::StoreAggregate;
use rust_decimal::Decimal;

/// Parameters of the KPI computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiPolicy {
    margin_fallback: Decimal,
}

impl KpiPolicy {
    /// `margin_fallback` is the margin assumed for a store without cost data,
    /// as a fraction between 0 and 1.
    pub fn new(margin_fallback: Decimal) -> Result<Self, AnalyticsError> {
        if margin_fallback < Decimal::ZERO || margin_fallback > Decimal::ONE {
            return Err(AnalyticsError::InvalidPolicy(format!(
                "margin fallback {margin_fallback} is outside [0, 1]"
            )));
        }
        Ok(Self { margin_fallback })
    }
}

/// The purchase price to report for a store.
///
/// A zero cost means no line of the store could be priced; reporting it as is
/// would show a 100% margin. It is replaced by `revenue * (1 - margin_fallback)`.
/// Returns the price and whether the fallback was used.
pub fn purchase_price_with_fallback(
    purchase_cost: Decimal,
    revenue: Decimal,
    margin_fallback: Decimal,
) -> (Decimal, bool) {
    if purchase_cost.is_zero() {
        (revenue * (Decimal::ONE - margin_fallback), true)
    } else {
        (purchase_cost, false)
    }
}

pub fn profit(revenue: Decimal, purchase_price: Decimal) -> Decimal {
    round2(revenue - purchase_price)
}

/// Gross margin as a percentage of revenue; 0 when revenue is 0.
pub fn margin_pct(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    round2(profit / revenue * Decimal::ONE_HUNDRED)
}

/// Revenue per square metre; 0 when the surface is unknown or not positive.
pub fn yield_per_area(revenue: Decimal, surface: Decimal) -> Decimal {
    if surface <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round2(revenue / surface)
}

/// Deviation from the benchmark turnover in percent; 0 without a positive benchmark.
pub fn gap_pct(revenue: Decimal, benchmark_turnover: Decimal) -> Decimal {
    if benchmark_turnover <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round2((revenue / benchmark_turnover - Decimal::ONE) * Decimal::ONE_HUNDRED)
}

/// Fills the derived columns of one store.
pub fn apply(store: &mut StoreAggregate, policy: &KpiPolicy) {
    let (purchase_price, fallback) =
        purchase_price_with_fallback(store.purchase_cost, store.revenue, policy.margin_fallback);

    store.purchase_price = purchase_price;
    store.cost_fallback_applied = fallback;
    store.profit = profit(store.revenue, purchase_price);
    store.margin_pct = margin_pct(store.profit, store.revenue);
    store.yield_per_area = yield_per_area(store.revenue, store.surface);
    store.gap_pct = gap_pct(store.revenue, store.benchmark_turnover);
}
