use core_types::{ReferenceField, ReferenceTable, StoreAggregate};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Outcome of one reference join, for the run log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Stores that found a reference row.
    pub matched: usize,
    /// Stores left at the zero default.
    pub defaulted: usize,
    /// Reference rows that match no store of the period.
    pub unused_reference_rows: usize,
}

/// Left-joins a reference table onto the store aggregates by store code.
///
/// Every store keeps exactly one row. Stores missing from the table get zero.
/// Keys of the table are unique by construction, so no store can match twice.
pub fn enrich(stores: &mut [StoreAggregate], table: &ReferenceTable) -> JoinStats {
    let mut stats = JoinStats::default();

    for store in stores.iter_mut() {
        let value = match table.get(&store.store_code) {
            Some(value) => {
                stats.matched += 1;
                value
            }
            None => {
                stats.defaulted += 1;
                Decimal::ZERO
            }
        };
        match table.field() {
            ReferenceField::Area => store.surface = value,
            ReferenceField::Benchmark => store.benchmark_turnover = value,
        }
    }

    let known: BTreeSet<&str> = stores.iter().map(|s| s.store_code.as_str()).collect();
    let unused: Vec<&str> = table.keys().filter(|k| !known.contains(k)).collect();
    stats.unused_reference_rows = unused.len();
    if !unused.is_empty() {
        tracing::debug!(dataset = %table.field(), stores = ?unused, "Reference rows without sales this period.");
    }

    stats
}
