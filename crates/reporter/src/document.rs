//! The one-page (or few-page) PDF summary: a header band, the report name and
//! period, then the top stores with a TOTAL row.
//!
//! Text is set in Courier, so a string of `n` characters at size `s` is exactly
//! `0.6 * s * n` points wide. That is what the centring and right alignment
//! below rely on.

use crate::error::ReportError;
use crate::format;
use analytics::ReportSummary;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use std::path::Path;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 22.5;
const BAND_HEIGHT: f32 = 80.0;
const ROW_HEIGHT: f32 = 18.0;
const FONT_SIZE: f32 = 9.0;
const GLYPH_WIDTH: f32 = 0.6;

/// Top of the table on the first page, below the band and the two info lines.
const FIRST_TABLE_TOP: f32 = PAGE_HEIGHT - BAND_HEIGHT - 70.0;
/// Top of the table on continuation pages.
const NEXT_TABLE_TOP: f32 = PAGE_HEIGHT - 50.0;
const TABLE_BOTTOM: f32 = 40.0;

const DOCUMENT_TITLE: &str = "ERP PERFORMANCE REPORT";

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

/// Summary table columns: heading, width in points, alignment.
const TABLE_COLUMNS: [(&str, f32, Align); 6] = [
    ("Store Code", 90.0, Align::Left),
    ("Revenue (HT)", 120.0, Align::Right),
    ("Profit", 110.0, Align::Right),
    ("GP %", 70.0, Align::Center),
    ("Yield / m2", 90.0, Align::Right),
    ("Gap %", 70.0, Align::Center),
];

/// What the document header shows.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub report_name: String,
    pub period_label: String,
}

/// Renders `summary` to a PDF file at `path`.
pub fn write_summary_document(
    path: &Path,
    header: &DocumentHeader,
    summary: &ReportSummary<'_>,
) -> Result<(), ReportError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let mut doc = build_document(header, summary)?;
    doc.save(path)
        .map_err(|e| ReportError::Document(e.to_string()))?;

    tracing::debug!(path = %path.display(), rows = summary.rows.len(), "Summary document written.");
    Ok(())
}

/// Splits `total` table lines (data rows plus the TOTAL row) over pages.
///
/// Returns how many lines go on each page. The first page holds fewer lines
/// than the following ones because of the header.
pub fn paginate(total: usize) -> Vec<usize> {
    let capacity = |top: f32| (((top - ROW_HEIGHT - TABLE_BOTTOM) / ROW_HEIGHT).floor() as usize).max(1);
    let first = capacity(FIRST_TABLE_TOP);
    let next = capacity(NEXT_TABLE_TOP);

    let mut pages = vec![total.min(first)];
    let mut remaining = total.saturating_sub(first);
    while remaining > 0 {
        let take = remaining.min(next);
        pages.push(take);
        remaining -= take;
    }
    pages
}

fn build_document(header: &DocumentHeader, summary: &ReportSummary<'_>) -> Result<Document, ReportError> {
    let mut lines: Vec<[String; 6]> = summary
        .rows
        .iter()
        .map(|row| {
            [
                row.store_code.clone(),
                format::amount(row.revenue),
                format::amount(row.profit),
                format::percent(row.margin_pct),
                format::amount(row.yield_per_area),
                format::percent(row.gap_pct),
            ]
        })
        .collect();
    // Ratio columns are left blank on the TOTAL row.
    lines.push([
        "TOTAL".to_string(),
        format::amount(summary.totals.revenue),
        format::amount(summary.totals.profit),
        String::new(),
        String::new(),
        String::new(),
    ]);
    let total_index = lines.len() - 1;

    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut next_line = 0;
    for (page_no, count) in paginate(lines.len()).into_iter().enumerate() {
        let mut ops = Vec::new();
        let mut top = if page_no == 0 {
            draw_page_header(&mut ops, header);
            FIRST_TABLE_TOP
        } else {
            NEXT_TABLE_TOP
        };

        let headings = TABLE_COLUMNS.map(|(title, _, _)| title.to_string());
        draw_row(&mut ops, top, &headings, Some(0.78), true);
        top -= ROW_HEIGHT;

        for line in &lines[next_line..next_line + count] {
            let is_total = next_line == total_index;
            let fill = if is_total { Some(0.94) } else { None };
            draw_row(&mut ops, top, line, fill, is_total);
            top -= ROW_HEIGHT;
            next_line += 1;
        }
        pages.push(ops);
    }

    assemble(pages)
}

fn draw_page_header(ops: &mut Vec<Operation>, header: &DocumentHeader) {
    // Dark blue-grey band across the top of the page.
    ops.push(Operation::new("rg", vec![0.173_f32.into(), 0.243_f32.into(), 0.314_f32.into()]));
    ops.push(Operation::new(
        "re",
        vec![0.0_f32.into(), (PAGE_HEIGHT - BAND_HEIGHT).into(), PAGE_WIDTH.into(), BAND_HEIGHT.into()],
    ));
    ops.push(Operation::new("f", vec![]));

    ops.push(Operation::new("g", vec![1.0_f32.into()]));
    let title_size: f32 = 18.0;
    let title_x = (PAGE_WIDTH - text_width(DOCUMENT_TITLE, title_size)) / 2.0;
    text(ops, "F2", title_size, title_x, PAGE_HEIGHT - 48.0, DOCUMENT_TITLE);

    ops.push(Operation::new("g", vec![0.0_f32.into()]));
    let info_top = PAGE_HEIGHT - BAND_HEIGHT - 25.0;
    text(ops, "F2", 12.0, MARGIN, info_top, &format!("Report Name: {}", header.report_name));
    text(ops, "F2", 12.0, MARGIN, info_top - 20.0, &format!("Period: {}", header.period_label));
}

/// Draws one table row whose top edge is at `top`.
fn draw_row(ops: &mut Vec<Operation>, top: f32, cells: &[String; 6], fill_gray: Option<f32>, bold: bool) {
    let bottom = top - ROW_HEIGHT;
    let font = if bold { "F2" } else { "F1" };
    let mut x = MARGIN;

    for ((_, width, align), value) in TABLE_COLUMNS.iter().zip(cells) {
        if let Some(gray) = fill_gray {
            ops.push(Operation::new("g", vec![gray.into()]));
            ops.push(Operation::new("re", vec![x.into(), bottom.into(), (*width).into(), ROW_HEIGHT.into()]));
            ops.push(Operation::new("f", vec![]));
            ops.push(Operation::new("g", vec![0.0_f32.into()]));
        }
        ops.push(Operation::new("w", vec![0.5_f32.into()]));
        ops.push(Operation::new("re", vec![x.into(), bottom.into(), (*width).into(), ROW_HEIGHT.into()]));
        ops.push(Operation::new("S", vec![]));

        let padding: f32 = 4.0;
        let value_width = text_width(value, FONT_SIZE);
        let text_x = match align {
            Align::Left => x + padding,
            Align::Center => x + (width - value_width) / 2.0,
            Align::Right => x + width - padding - value_width,
        };
        text(ops, font, FONT_SIZE, text_x, bottom + 6.0, value);
        x += width;
    }
}

fn text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::String(latin1(value), StringFormat::Literal)]));
    ops.push(Operation::new("ET", vec![]));
}

fn text_width(value: &str, size: f32) -> f32 {
    value.chars().count() as f32 * GLYPH_WIDTH * size
}

/// The standard fonts use WinAnsiEncoding; anything outside Latin-1 becomes '?'.
fn latin1(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Document, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ReportError::Document(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::Totals;
    use core_types::StoreAggregate;
    use rust_decimal_macros::dec;

    fn header() -> DocumentHeader {
        DocumentHeader {
            report_name: "Store Performance".to_string(),
            period_label: "09/2024".to_string(),
        }
    }

    fn rows(n: usize) -> Vec<StoreAggregate> {
        (0..n)
            .map(|i| {
                let mut row = StoreAggregate::new(format!("S{i:03}"));
                row.revenue = dec!(1000);
                row.profit = dec!(250);
                row
            })
            .collect()
    }

    #[test]
    fn a_top_thirty_summary_fits_on_one_page() {
        assert_eq!(paginate(31), vec![31]);
    }

    #[test]
    fn long_tables_continue_on_new_pages() {
        let pages = paginate(200);
        assert!(pages.len() > 1);
        assert_eq!(pages.iter().sum::<usize>(), 200);
        assert!(pages[1] > pages[0]);
    }

    #[test]
    fn an_empty_summary_still_has_one_page() {
        assert_eq!(paginate(1), vec![1]);
    }

    #[test]
    fn writes_a_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.pdf");
        let data = rows(3);
        let summary = ReportSummary {
            rows: &data,
            totals: Totals::of(&data),
        };

        write_summary_document(&path, &header(), &summary).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn long_summary_produces_several_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.pdf");
        let data = rows(120);
        let summary = ReportSummary {
            rows: &data,
            totals: Totals::of(&data),
        };

        write_summary_document(&path, &header(), &summary).unwrap();

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), paginate(121).len());
    }

    #[test]
    fn non_latin_characters_are_replaced() {
        assert_eq!(latin1("Café"), b"Caf\xe9".to_vec());
        assert_eq!(latin1("店"), b"?".to_vec());
    }
}
