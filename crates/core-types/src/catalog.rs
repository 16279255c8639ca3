use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// One barcode-to-article link from the product catalog.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub barcode: String,
    /// Internal identifier of the article the barcode points to.
    pub entity_id: i64,
    /// `None` when the article has no purchase price on file.
    pub purchase_price: Option<Decimal>,
}

/// A barcode lookup where every barcode resolves to exactly one entry.
///
/// A barcode linked to several articles resolves to the one with the highest
/// internal identifier. Pricing a sale against every linked article would
/// count the line once per link.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl ProductCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut resolved: HashMap<String, CatalogEntry> = HashMap::new();
        for entry in entries {
            match resolved.get(&entry.barcode) {
                Some(current) if current.entity_id >= entry.entity_id => {}
                _ => {
                    resolved.insert(entry.barcode.clone(), entry);
                }
            }
        }
        Self { entries: resolved }
    }

    pub fn resolve(&self, barcode: &str) -> Option<&CatalogEntry> {
        self.entries.get(barcode)
    }

    /// Unit purchase price for a barcode, if the catalog knows one.
    pub fn unit_price(&self, barcode: &str) -> Option<Decimal> {
        self.resolve(barcode).and_then(|e| e.purchase_price)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(barcode: &str, entity_id: i64, price: Option<Decimal>) -> CatalogEntry {
        CatalogEntry {
            barcode: barcode.to_string(),
            entity_id,
            purchase_price: price,
        }
    }

    #[test]
    fn highest_identifier_wins() {
        let catalog = ProductCatalog::from_entries(vec![
            entry("X", 5, Some(dec!(1))),
            entry("X", 12, Some(dec!(2))),
            entry("X", 7, Some(dec!(3))),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("X").unwrap().entity_id, 12);
        assert_eq!(catalog.unit_price("X"), Some(dec!(2)));
    }

    #[test]
    fn resolution_does_not_depend_on_input_order() {
        let forward = ProductCatalog::from_entries(vec![entry("X", 5, None), entry("X", 12, Some(dec!(9)))]);
        let backward = ProductCatalog::from_entries(vec![entry("X", 12, Some(dec!(9))), entry("X", 5, None)]);
        assert_eq!(forward.resolve("X"), backward.resolve("X"));
    }

    #[test]
    fn winning_entry_without_price_yields_no_price() {
        // The tie-break is on the identifier, not on which entry has a price.
        let catalog = ProductCatalog::from_entries(vec![entry("X", 5, Some(dec!(4))), entry("X", 6, None)]);
        assert_eq!(catalog.unit_price("X"), None);
    }

    #[test]
    fn unknown_barcode_is_unpriced() {
        assert_eq!(ProductCatalog::default().unit_price("nope"), None);
    }
}
