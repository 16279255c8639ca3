use crate::aggregate::aggregate;
use crate::enrich::{enrich, JoinStats};
use crate::error::AnalyticsError;
use crate::kpi::{self, KpiPolicy};
use core_types::{ReferenceField, ReferenceTable, StoreAggregate, TransactionRecord};

/// The computed store table and how each reference join went.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub stores: Vec<StoreAggregate>,
    pub area: JoinStats,
    pub benchmark: JoinStats,
}

/// A stateless calculator turning priced transaction records into the final
/// per-store table.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    policy: KpiPolicy,
}

impl AnalyticsEngine {
    pub fn new(policy: KpiPolicy) -> Self {
        Self { policy }
    }

    /// Runs aggregation, both reference joins and the KPI derivation.
    ///
    /// # Arguments
    ///
    /// * `records` - Every priced sale line of the period.
    /// * `area` - The area reference table (possibly empty).
    /// * `benchmark` - The benchmark reference table (possibly empty).
    pub fn run(
        &self,
        records: &[TransactionRecord],
        area: &ReferenceTable,
        benchmark: &ReferenceTable,
    ) -> Result<EngineOutput, AnalyticsError> {
        let mut stores = self.aggregate(records);
        let area = self.enrich(&mut stores, area, ReferenceField::Area)?;
        let benchmark = self.enrich(&mut stores, benchmark, ReferenceField::Benchmark)?;
        self.compute(&mut stores);
        Ok(EngineOutput {
            stores,
            area,
            benchmark,
        })
    }

    pub fn aggregate(&self, records: &[TransactionRecord]) -> Vec<StoreAggregate> {
        aggregate(records)
    }

    /// Joins `table` onto the stores, checking it is the dataset the caller
    /// meant to join.
    pub fn enrich(
        &self,
        stores: &mut [StoreAggregate],
        table: &ReferenceTable,
        expected: ReferenceField,
    ) -> Result<JoinStats, AnalyticsError> {
        if table.field() != expected {
            return Err(AnalyticsError::DatasetMismatch {
                expected: expected.to_string(),
                found: table.field().to_string(),
            });
        }
        Ok(enrich(stores, table))
    }

    /// Derives purchase price, profit, margin, yield and gap for every store.
    pub fn compute(&self, stores: &mut [StoreAggregate]) {
        for store in stores.iter_mut() {
            kpi::apply(store, &self.policy);
        }
    }
}
