use crate::error::ReportError;
use core_types::StoreAggregate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use umya_spreadsheet::Worksheet;

pub const SHEET_NAME: &str = "Stores";

/// Header row of the workbook, one entry per column.
pub const COLUMNS: [&str; 12] = [
    "Store Code",
    "Quantity",
    "Revenue (HT)",
    "Purchase Price",
    "Profit",
    "GP %",
    "Surface (m2)",
    "Yield / m2",
    "Benchmark",
    "Gap %",
    "Unpriced Lines",
    "Cost Fallback",
];

/// Writes every store and every computed column to an .xlsx workbook, in
/// the order given.
pub fn write_spreadsheet(path: &Path, rows: &[StoreAggregate]) -> Result<(), ReportError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| ReportError::Spreadsheet("new workbook has no default sheet".to_string()))?;
    sheet.set_name(SHEET_NAME);

    for (i, title) in COLUMNS.iter().enumerate() {
        let col = i as u32 + 1;
        sheet.get_cell_mut((col, 1)).set_value_string(*title);
        sheet.get_style_mut((col, 1)).get_font_mut().set_bold(true);
    }

    for (i, row) in rows.iter().enumerate() {
        let line = i as u32 + 2;
        sheet.get_cell_mut((1, line)).set_value_string(row.store_code.clone());
        put_number(sheet, 2, line, row.quantity);
        put_number(sheet, 3, line, row.revenue);
        put_number(sheet, 4, line, row.purchase_price);
        put_number(sheet, 5, line, row.profit);
        put_number(sheet, 6, line, row.margin_pct);
        put_number(sheet, 7, line, row.surface);
        put_number(sheet, 8, line, row.yield_per_area);
        put_number(sheet, 9, line, row.benchmark_turnover);
        put_number(sheet, 10, line, row.gap_pct);
        put_number(sheet, 11, line, Decimal::from(row.unpriced_lines));
        sheet
            .get_cell_mut((12, line))
            .set_value_string(if row.cost_fallback_applied { "yes" } else { "no" });
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| ReportError::Spreadsheet(e.to_string()))?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Spreadsheet written.");
    Ok(())
}

fn put_number(sheet: &mut Worksheet, col: u32, row: u32, value: Decimal) {
    sheet
        .get_cell_mut((col, row))
        .set_value_number(value.to_f64().unwrap_or_default());
}
