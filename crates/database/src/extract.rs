use crate::error::DbError;
use crate::source::TransactionSource;
use core_types::money::excl_tax;
use core_types::{normalize_store_code, ProductCatalog, RawSale, SalesQuery, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Pulls the period's sale lines out of `source` and prices them.
///
/// Two reads are made: the filtered sale lines, then the catalog links of the
/// barcodes they mention. Lines are re-checked against `query` in process, so
/// a source that filters loosely still cannot leak excluded lines.
pub async fn extract<S>(
    source: &S,
    query: &SalesQuery,
    vat_rate: Decimal,
) -> Result<Vec<TransactionRecord>, DbError>
where
    S: TransactionSource + ?Sized,
{
    let sales = source.fetch_sales(query).await?;

    let barcodes: Vec<String> = sales
        .iter()
        .filter_map(|s| s.barcode.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let catalog = ProductCatalog::from_entries(source.fetch_catalog(&barcodes).await?);

    tracing::debug!(
        lines = sales.len(),
        barcodes = barcodes.len(),
        catalog_entries = catalog.len(),
        "Fetched sale lines and catalog."
    );

    Ok(price_lines(&sales, &catalog, query, vat_rate))
}

/// Turns raw sale lines into priced transaction records.
///
/// Lines the query does not accept are dropped. A line whose barcode resolves
/// to no purchase price keeps an absent cost.
pub fn price_lines(
    sales: &[RawSale],
    catalog: &ProductCatalog,
    query: &SalesQuery,
    vat_rate: Decimal,
) -> Vec<TransactionRecord> {
    sales
        .iter()
        .filter(|sale| query.accepts(sale))
        .map(|sale| {
            let unit_price = sale.barcode.as_deref().and_then(|b| catalog.unit_price(b));
            TransactionRecord {
                store_code: normalize_store_code(&sale.store_code),
                quantity: sale.quantity,
                total_incl_tax: sale.total_incl_tax,
                total_excl_tax: excl_tax(sale.total_incl_tax, vat_rate),
                purchase_cost: unit_price.map(|price| price * sale.quantity),
            }
        })
        .collect()
}
