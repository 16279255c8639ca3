use core_types::{SortKey, StoreAggregate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// The final per-store table, ranked and frozen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreReport {
    rows: Vec<StoreAggregate>,
    sort_by: SortKey,
}

/// Revenue and profit summed over a set of rows. Ratio columns are not summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub revenue: Decimal,
    pub profit: Decimal,
}

impl Totals {
    pub fn of(rows: &[StoreAggregate]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            revenue: acc.revenue + row.revenue,
            profit: acc.profit + row.profit,
        })
    }
}

/// The head of the ranking, as shown in the summary document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary<'a> {
    pub rows: &'a [StoreAggregate],
    pub totals: Totals,
}

impl StoreReport {
    /// Ranks `rows` by `sort_by`, highest first. Equal keys are ordered by
    /// store code so that the ranking is stable from one run to the next.
    pub fn new(mut rows: Vec<StoreAggregate>, sort_by: SortKey) -> Self {
        let key = |row: &StoreAggregate| match sort_by {
            SortKey::Revenue => row.revenue,
            SortKey::YieldPerArea => row.yield_per_area,
        };
        rows.sort_by(|a, b| match key(b).cmp(&key(a)) {
            Ordering::Equal => a.store_code.cmp(&b.store_code),
            other => other,
        });
        Self { rows, sort_by }
    }

    pub fn rows(&self) -> &[StoreAggregate] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Totals over every store of the period.
    pub fn totals(&self) -> Totals {
        Totals::of(&self.rows)
    }

    /// The first `top_n` rows and their totals.
    pub fn summary(&self, top_n: usize) -> ReportSummary<'_> {
        let rows = &self.rows[..top_n.min(self.rows.len())];
        ReportSummary {
            rows,
            totals: Totals::of(rows),
        }
    }
}
