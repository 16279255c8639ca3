use crate::error::DbError;
use crate::source::TransactionSource;
use async_trait::async_trait;
use core_types::{CatalogEntry, RawSale, SalesQuery};
use sqlx::postgres::PgPool;

/// Sale lines for a date range, restricted to counted sale types and with the
/// excluded product families removed. Every filter value is a bound parameter.
pub const SALES_SQL: &str = r#"
SELECT
    TRIM(h.codemag::text)   AS store_code,
    h.quantite::numeric     AS quantity,
    h.total::numeric        AS total_incl_tax,
    h.barcode::text         AS barcode,
    h.famille::text         AS category,
    h.typevente::text       AS sale_type,
    h.reception::date       AS business_date
FROM histovente AS h
WHERE h.codemag IS NOT NULL
  AND h.reception::date BETWEEN $1 AND $2
  AND h.typevente = ANY($3)
  AND h.famille IS NOT NULL
  AND NOT (h.famille = ANY($4))
"#;

/// Every barcode link for a set of barcodes, with the purchase price of the
/// linked article. Ties between links are resolved by `ProductCatalog`.
pub const CATALOG_SQL: &str = r#"
SELECT
    c.codebarre::text       AS barcode,
    c.identite::bigint      AS entity_id,
    a.prixachat::numeric    AS purchase_price
FROM codebarre AS c
LEFT JOIN article AS a ON a.idarticle = c.identite
WHERE c.codebarre = ANY($1)
"#;

/// The `DbRepository` is the read-only gateway to the point-of-sale database.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a ready connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Closes every connection of the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TransactionSource for DbRepository {
    async fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<RawSale>, DbError> {
        let rows = sqlx::query_as::<_, RawSale>(SALES_SQL)
            .bind(query.start_date)
            .bind(query.end_date)
            .bind(query.sale_types.as_slice())
            .bind(query.excluded_categories.as_slice())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_catalog(&self, barcodes: &[String]) -> Result<Vec<CatalogEntry>, DbError> {
        if barcodes.is_empty() {
            return Ok(Vec::new());
        }
        let entries = sqlx::query_as::<_, CatalogEntry>(CATALOG_SQL)
            .bind(barcodes)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}
