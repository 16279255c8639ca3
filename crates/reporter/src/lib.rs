//! # Storeperf Reporter
//!
//! Renders the final store table into the two report artifacts:
//!
//! - a full-detail `.xlsx` workbook (every store, every column);
//! - a summary `.pdf` (top-N stores plus a TOTAL row).
//!
//! The artifacts are independent. `render_artifacts` always attempts both and
//! reports each outcome separately.

pub mod document;
pub mod error;
pub mod format;
pub mod spreadsheet;

use analytics::StoreReport;
use std::path::{Path, PathBuf};

pub use document::{write_summary_document, DocumentHeader};
pub use error::ReportError;
pub use spreadsheet::write_spreadsheet;

/// Where and under which name the artifacts are written.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub output_dir: &'a Path,
    pub file_name: &'a str,
    pub header: DocumentHeader,
    pub top_n: usize,
}

/// The result of each artifact, kept apart so one failure cannot hide the other.
#[derive(Debug)]
pub struct RenderOutcome {
    pub spreadsheet: Result<PathBuf, ReportError>,
    pub document: Result<PathBuf, ReportError>,
}

impl RenderOutcome {
    /// Paths of the artifacts that were written.
    pub fn produced(&self) -> Vec<PathBuf> {
        [&self.spreadsheet, &self.document]
            .into_iter()
            .filter_map(|r| r.as_ref().ok().cloned())
            .collect()
    }
}

/// Writes the workbook and the summary document for `report`.
pub fn render_artifacts(request: &RenderRequest<'_>, report: &StoreReport) -> RenderOutcome {
    let xlsx_path = request.output_dir.join(format!("{}.xlsx", request.file_name));
    let spreadsheet = write_spreadsheet(&xlsx_path, report.rows()).map(|()| xlsx_path);
    match &spreadsheet {
        Ok(path) => tracing::info!(path = %path.display(), stores = report.len(), "Spreadsheet saved."),
        Err(e) => tracing::error!(error = %e, "Spreadsheet could not be produced."),
    }

    let pdf_path = request.output_dir.join(format!("{}.pdf", request.file_name));
    let summary = report.summary(request.top_n);
    let document = write_summary_document(&pdf_path, &request.header, &summary).map(|()| pdf_path);
    match &document {
        Ok(path) => tracing::info!(path = %path.display(), stores = summary.rows.len(), "Summary document saved."),
        Err(e) => tracing::error!(error = %e, "Summary document could not be produced."),
    }

    RenderOutcome {
        spreadsheet,
        document,
    }
}
