use crate::error::ReferenceError;
use core_types::{ReferenceField, ReferenceTable};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const KEY_COLUMN: &str = "store_code";

/// Reads a reference table from CSV.
///
/// The file needs a `store_code` column and the value column of `field`
/// (`area_m2` or `benchmark_revenue`); other columns are ignored. Header names
/// are matched case-insensitively. An empty value reads as zero.
pub fn read_reference<R: Read>(reader: R, field: ReferenceField) -> Result<ReferenceTable, ReferenceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| ReferenceError::MissingColumn(name.to_string()))
    };
    let key_idx = column(KEY_COLUMN)?;
    let value_idx = column(field.value_column())?;

    let mut table = ReferenceTable::empty(field);
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let store_code = record.get(key_idx).unwrap_or_default();
        if store_code.is_empty() {
            tracing::debug!(dataset = %field, line, "Skipping reference row without a store code.");
            continue;
        }

        let raw_value = record.get(value_idx).unwrap_or_default();
        let value = if raw_value.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from_str(raw_value).map_err(|_| ReferenceError::InvalidValue {
                line,
                store_code: store_code.to_string(),
                value: raw_value.to_string(),
            })?
        };

        table.insert(store_code, value)?;
    }

    Ok(table)
}

/// Reads a reference table from a CSV file.
pub fn load_reference(path: &Path, field: ReferenceField) -> Result<ReferenceTable, ReferenceError> {
    if !path.exists() {
        return Err(ReferenceError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    read_reference(file, field)
}

/// Loads an optional reference dataset for the enrichment stage.
///
/// Returns an empty table, and logs a warning, when no path is configured or
/// the file is missing or malformed. A duplicated store code is returned as an
/// error.
pub fn load_or_default(path: Option<&Path>, field: ReferenceField) -> Result<ReferenceTable, ReferenceError> {
    let Some(path) = path else {
        tracing::warn!(dataset = %field, "No reference file configured; every store defaults to 0.");
        return Ok(ReferenceTable::empty(field));
    };

    match load_reference(path, field) {
        Ok(table) => {
            tracing::info!(dataset = %field, path = %path.display(), stores = table.len(), "Reference data loaded.");
            Ok(table)
        }
        Err(e) if e.is_recoverable() => {
            tracing::warn!(
                dataset = %field,
                path = %path.display(),
                error = %e,
                "Reference data unavailable; every store defaults to 0."
            );
            Ok(ReferenceTable::empty(field))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn reads_keys_and_values() {
        let csv = "store_code,area_m2\nA1,120.5\n B2 ,80\nC3,\n";
        let table = read_reference(csv.as_bytes(), ReferenceField::Area).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A1"), Some(dec!(120.5)));
        assert_eq!(table.get("B2"), Some(dec!(80)));
        assert_eq!(table.get("C3"), Some(Decimal::ZERO));
    }

    #[test]
    fn ignores_extra_columns_and_header_case() {
        let csv = "Region,Store_Code,Benchmark_Revenue\nNorth,A1,5000\n";
        let table = read_reference(csv.as_bytes(), ReferenceField::Benchmark).unwrap();
        assert_eq!(table.get("A1"), Some(dec!(5000)));
    }

    #[test]
    fn duplicate_store_is_not_recoverable() {
        let csv = "store_code,area_m2\nA1,100\nA1,200\n";
        let err = read_reference(csv.as_bytes(), ReferenceField::Area).unwrap_err();
        assert!(matches!(err, ReferenceError::DuplicateKey(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn missing_value_column_is_reported() {
        let csv = "store_code,surface\nA1,100\n";
        let err = read_reference(csv.as_bytes(), ReferenceField::Area).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingColumn(ref c) if c == "area_m2"));
    }

    #[test]
    fn non_numeric_value_names_the_line() {
        let csv = "store_code,area_m2\nA1,100\nB2,big\n";
        match read_reference(csv.as_bytes(), ReferenceField::Area) {
            Err(ReferenceError::InvalidValue { line, store_code, value }) => {
                assert_eq!(line, 3);
                assert_eq!(store_code, "B2");
                assert_eq!(value, "big");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_file_falls_back_to_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = load_or_default(Some(&dir.path().join("absent.csv")), ReferenceField::Area).unwrap();
        assert!(table.is_empty());

        let table = load_or_default(None, ReferenceField::Benchmark).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_file_falls_back_but_duplicates_do_not() {
        let dir = tempfile::tempdir().unwrap();

        let malformed = dir.path().join("malformed.csv");
        std::fs::write(&malformed, "store_code,area_m2\nA1,abc\n").unwrap();
        assert!(load_or_default(Some(&malformed), ReferenceField::Area).unwrap().is_empty());

        let duplicated = dir.path().join("duplicated.csv");
        let mut file = std::fs::File::create(&duplicated).unwrap();
        writeln!(file, "store_code,area_m2\nA1,1\nA1,2").unwrap();
        assert!(load_or_default(Some(&duplicated), ReferenceField::Area).is_err());
    }

    #[test]
    fn loads_a_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark.csv");
        std::fs::write(&path, "store_code,benchmark_revenue\nA1,1000\nB2,2500.50\n").unwrap();

        let table = load_reference(&path, ReferenceField::Benchmark).unwrap();
        assert_eq!(table.get("B2"), Some(dec!(2500.50)));
    }
}
