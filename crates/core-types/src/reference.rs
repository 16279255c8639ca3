use crate::enums::ReferenceField;
use crate::error::CoreError;
use crate::sales::normalize_store_code;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A reference dataset keyed by normalized store code.
///
/// Keys are unique. A table that lists the same store twice is rejected when
/// it is built, so a join against it can never duplicate a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    field: ReferenceField,
    values: BTreeMap<String, Decimal>,
}

impl ReferenceTable {
    pub fn empty(field: ReferenceField) -> Self {
        Self {
            field,
            values: BTreeMap::new(),
        }
    }

    pub fn from_pairs<K: AsRef<str>>(
        field: ReferenceField,
        pairs: impl IntoIterator<Item = (K, Decimal)>,
    ) -> Result<Self, CoreError> {
        let mut table = Self::empty(field);
        for (key, value) in pairs {
            table.insert(key.as_ref(), value)?;
        }
        Ok(table)
    }

    /// Adds one row, failing on a key that is already present.
    pub fn insert(&mut self, store_code: &str, value: Decimal) -> Result<(), CoreError> {
        let key = normalize_store_code(store_code);
        if self.values.contains_key(&key) {
            return Err(CoreError::DuplicateKey {
                dataset: self.field.to_string(),
                key,
            });
        }
        self.values.insert(key, value);
        Ok(())
    }

    pub fn field(&self) -> ReferenceField {
        self.field
    }

    pub fn get(&self, store_code: &str) -> Option<Decimal> {
        self.values.get(&normalize_store_code(store_code)).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn keys_are_normalized_on_both_sides() {
        let table = ReferenceTable::from_pairs(ReferenceField::Area, vec![(" A1 ", dec!(120))]).unwrap();
        assert_eq!(table.get("A1"), Some(dec!(120)));
        assert_eq!(table.get("A1  "), Some(dec!(120)));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = ReferenceTable::from_pairs(
            ReferenceField::Benchmark,
            vec![("A1", dec!(1)), ("B2", dec!(2)), ("A1 ", dec!(3))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::DuplicateKey {
                dataset: "benchmark".to_string(),
                key: "A1".to_string()
            }
        );
    }
}
