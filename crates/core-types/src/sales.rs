use crate::error::CoreError;
use crate::period::ReportPeriod;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Normalizes a store code so that the same store always joins the same way,
/// whichever table the code came from.
pub fn normalize_store_code(raw: &str) -> String {
    raw.trim().to_string()
}

/// A sale line exactly as the point-of-sale database stores it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct RawSale {
    pub store_code: String,
    pub quantity: Decimal,
    pub total_incl_tax: Decimal,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub sale_type: String,
    pub business_date: NaiveDate,
}

/// A priced sale line, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub store_code: String,
    pub quantity: Decimal,
    pub total_incl_tax: Decimal,
    pub total_excl_tax: Decimal,
    /// `None` when the barcode has no catalog entry or no purchase price.
    pub purchase_cost: Option<Decimal>,
}

/// The parameters of the monthly extraction, validated once and then shared
/// by the SQL query and the in-process filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sale_types: Vec<String>,
    pub excluded_categories: Vec<String>,
}

impl SalesQuery {
    /// Builds the query for a whole report period.
    pub fn for_period(
        period: &ReportPeriod,
        sale_types: &[String],
        excluded_categories: &[String],
    ) -> Result<Self, CoreError> {
        Self::new(
            period.start_date(),
            period.end_date(),
            sale_types,
            excluded_categories,
        )
    }

    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        sale_types: &[String],
        excluded_categories: &[String],
    ) -> Result<Self, CoreError> {
        if start_date > end_date {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("{start_date} is after {end_date}"),
            ));
        }
        if sale_types.is_empty() {
            return Err(CoreError::InvalidInput(
                "sale_types".to_string(),
                "at least one sale type is required".to_string(),
            ));
        }
        for label in sale_types {
            check_label("sale_types", label)?;
        }
        for label in excluded_categories {
            check_label("excluded_categories", label)?;
        }

        Ok(Self {
            start_date,
            end_date,
            sale_types: sale_types.to_vec(),
            excluded_categories: excluded_categories.to_vec(),
        })
    }

    /// Whether a sale line belongs to this extraction.
    ///
    /// A line without a category is dropped, as the `NOT IN` family filter
    /// of the sales query drops it.
    pub fn accepts(&self, sale: &RawSale) -> bool {
        let in_range = sale.business_date >= self.start_date && sale.business_date <= self.end_date;
        let counted_type = self.sale_types.iter().any(|t| t == &sale.sale_type);
        let allowed_category = sale
            .category
            .as_ref()
            .is_some_and(|c| !self.excluded_categories.iter().any(|e| e == c));

        in_range && counted_type && allowed_category
    }
}

/// Filter labels are bound as query parameters, but they must still look like
/// labels: non-empty, already trimmed, no control characters.
pub fn check_label(field: &str, label: &str) -> Result<(), CoreError> {
    if label.is_empty() || label.trim() != label || label.chars().any(char::is_control) {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            format!("'{}' is not a valid label", label.escape_debug()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn query() -> SalesQuery {
        let period = ReportPeriod::new(9, 2024).unwrap();
        SalesQuery::for_period(&period, &labels(&["Vente", "Avoir"]), &labels(&["SERVICES", "DIVERS"]))
            .unwrap()
    }

    fn sale(category: Option<&str>, sale_type: &str, day: u32) -> RawSale {
        RawSale {
            store_code: "A1".to_string(),
            quantity: dec!(1),
            total_incl_tax: dec!(11.90),
            barcode: Some("X".to_string()),
            category: category.map(str::to_string),
            sale_type: sale_type.to_string(),
            business_date: NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
        }
    }

    #[test]
    fn normalizes_surrounding_whitespace() {
        assert_eq!(normalize_store_code("  A1 "), "A1");
        assert_eq!(normalize_store_code("A1"), "A1");
    }

    #[test]
    fn excluded_categories_never_pass() {
        let q = query();
        assert!(!q.accepts(&sale(Some("SERVICES"), "Vente", 10)));
        assert!(!q.accepts(&sale(Some("DIVERS"), "Avoir", 1)));
        assert!(q.accepts(&sale(Some("TEXTILE"), "Vente", 10)));
    }

    #[test]
    fn uncategorised_lines_are_dropped() {
        assert!(!query().accepts(&sale(None, "Vente", 10)));

        // Also with nothing excluded: a missing family never matches the filter.
        let period = ReportPeriod::new(9, 2024).unwrap();
        let open = SalesQuery::for_period(&period, &labels(&["Vente"]), &[]).unwrap();
        assert!(!open.accepts(&sale(None, "Vente", 10)));
        assert!(open.accepts(&sale(Some("SERVICES"), "Vente", 10)));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let q = query();
        assert!(q.accepts(&sale(Some("TEXTILE"), "Vente", 1)));
        assert!(q.accepts(&sale(Some("TEXTILE"), "Vente", 30)));

        let mut october = sale(Some("TEXTILE"), "Vente", 1);
        october.business_date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert!(!q.accepts(&october));
    }

    #[test]
    fn only_recognized_sale_types_pass() {
        assert!(!query().accepts(&sale(Some("TEXTILE"), "Transfert", 10)));
    }

    #[test]
    fn rejects_suspicious_labels() {
        let period = ReportPeriod::new(9, 2024).unwrap();
        let sale_types = labels(&["Vente"]);
        assert!(SalesQuery::for_period(&period, &sale_types, &labels(&[" SERVICES"])).is_err());
        assert!(SalesQuery::for_period(&period, &sale_types, &labels(&[""])).is_err());
        assert!(SalesQuery::for_period(&period, &sale_types, &labels(&["A\nB"])).is_err());
        assert!(SalesQuery::for_period(&period, &[], &[]).is_err());
    }

    #[test]
    fn rejects_inverted_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert!(SalesQuery::new(start, end, &labels(&["Vente"]), &[]).is_err());
    }
}
