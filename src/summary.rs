use analytics::StoreReport;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use core_types::StoreAggregate;
use rust_decimal::Decimal;

/// Builds the console table of the top `top_n` stores and their totals.
pub fn top_stores_table(report: &StoreReport, top_n: usize) -> Table {
    let summary = report.summary(top_n);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Store", "Revenue (HT)", "Profit", "GP %", "Yield / m2", "Gap %",
    ]);

    for row in summary.rows {
        table.add_row(row_cells(row));
    }
    table.add_row(vec![
        Cell::new("TOTAL"),
        number(summary.totals.revenue),
        number(summary.totals.profit),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
    ]);

    table
}

fn row_cells(row: &StoreAggregate) -> Vec<Cell> {
    vec![
        Cell::new(&row.store_code),
        number(row.revenue),
        number(row.profit),
        number(row.margin_pct),
        number(row.yield_per_area),
        number(row.gap_pct),
    ]
}

fn number(value: Decimal) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}
