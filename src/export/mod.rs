//! Result export
//!
//! Serializes OCR results as a four-column table in two formats. Both
//! writers consume the same [`TableRow`]s, so row count, order and values
//! always agree.

mod csv;
mod xlsx;

use serde::Serialize;

use crate::ocr::ZoneResult;

pub use self::csv::to_csv;
pub use self::xlsx::to_xlsx;

/// Column headers, in order
pub const HEADERS: [&str; 4] = ["Page", "Zone", "Text", "Coordinates"];

pub const CSV_FILE_NAME: &str = "ocr_results.csv";
pub const XLSX_FILE_NAME: &str = "ocr_results.xlsx";
pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest text a spreadsheet cell accepts, in characters
///
/// Applied to both formats so CSV and XLSX cells always match.
pub const MAX_CELL_CHARS: usize = 32_767;

/// One row of the exported table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub page: usize,
    pub zone: usize,
    pub text: String,
    pub coordinates: String,
}

impl From<&ZoneResult> for TableRow {
    fn from(result: &ZoneResult) -> Self {
        Self {
            page: result.page_number,
            zone: result.zone_number,
            text: fit_cell(&result.text),
            coordinates: fit_cell(&result.coordinates),
        }
    }
}

fn fit_cell(value: &str) -> String {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            tracing::warn!(
                chars = value.chars().count(),
                "Truncating cell to {} characters",
                MAX_CELL_CHARS
            );
            value[..end].to_string()
        }
        None => value.to_string(),
    }
}

/// Rows in production order, no sorting or filtering
pub fn table_rows(results: &[ZoneResult]) -> Vec<TableRow> {
    results.iter().map(TableRow::from).collect()
}

/// Export error types
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}


#[cfg(test)]
pub(crate) mod fixtures {
    use crate::ocr::ZoneResult;

    pub fn results() -> Vec<ZoneResult> {
        vec![
            ZoneResult {
                page_number: 1,
                zone_number: 1,
                text: "ACME Corp\n42 Main St, Springfield".to_string(),
                coordinates: "(0,0) to (300,80)".to_string(),
            },
            ZoneResult {
                page_number: 1,
                zone_number: 2,
                text: String::new(),
                coordinates: "(10,100) to (200,120)".to_string(),
            },
            ZoneResult {
                page_number: 3,
                zone_number: 3,
                text: "Said \"paid\"".to_string(),
                coordinates: "(5,5) to (50,50)".to_string(),
            },
        ]
    }
}
