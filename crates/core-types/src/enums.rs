use serde::{Deserialize, Serialize};
use std::fmt;

/// The column the final table is ranked by, highest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Revenue,
    YieldPerArea,
}

/// The two reference datasets joined onto the store aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceField {
    /// Floor space of a store, in square metres.
    Area,
    /// External benchmark turnover for the period.
    Benchmark,
}

impl ReferenceField {
    /// The CSV column that carries this dataset's value.
    pub fn value_column(&self) -> &'static str {
        match self {
            ReferenceField::Area => "area_m2",
            ReferenceField::Benchmark => "benchmark_revenue",
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceField::Area => write!(f, "area"),
            ReferenceField::Benchmark => write!(f, "benchmark"),
        }
    }
}
