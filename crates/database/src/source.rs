use crate::error::DbError;
use async_trait::async_trait;
use core_types::{CatalogEntry, RawSale, SalesQuery};

/// The read-only interface the extraction needs from the point-of-sale store.
///
/// `DbRepository` is the production implementation; tests run the extraction
/// against an in-memory store through the same contract.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetches the sale lines matching `query`.
    async fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<RawSale>, DbError>;

    /// Fetches every catalog link for the given barcodes, duplicates included.
    async fn fetch_catalog(&self, barcodes: &[String]) -> Result<Vec<CatalogEntry>, DbError>;
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;

    /// A store holding its rows in memory. It applies the same filter the SQL
    /// query does.
    #[derive(Debug, Default)]
    pub struct InMemorySource {
        pub sales: Vec<RawSale>,
        pub catalog: Vec<CatalogEntry>,
    }

    #[async_trait]
    impl TransactionSource for InMemorySource {
        async fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<RawSale>, DbError> {
            Ok(self.sales.iter().filter(|s| query.accepts(s)).cloned().collect())
        }

        async fn fetch_catalog(&self, barcodes: &[String]) -> Result<Vec<CatalogEntry>, DbError> {
            Ok(self
                .catalog
                .iter()
                .filter(|e| barcodes.contains(&e.barcode))
                .cloned()
                .collect())
        }
    }
}
