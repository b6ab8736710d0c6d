//! Spreadsheet export

use rust_xlsxwriter::{Format, Workbook};

use crate::ocr::ZoneResult;

use super::{table_rows, ExportError, HEADERS};

const SHEET_NAME: &str = "Sheet1";

/// Render results as an XLSX workbook with a single sheet
pub fn to_xlsx(results: &[ZoneResult]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in table_rows(results).iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_number(r, 0, row.page as f64)?;
        sheet.write_number(r, 1, row.zone as f64)?;
        sheet.write_string(r, 2, &row.text)?;
        sheet.write_string(r, 3, &row.coordinates)?;
    }

    Ok(workbook.save_to_buffer()?)
}
