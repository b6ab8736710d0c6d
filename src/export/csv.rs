//! CSV export

use crate::ocr::ZoneResult;

use super::{table_rows, ExportError, HEADERS};

/// Render results as CSV with a header row
///
/// Fields containing commas, quotes or newlines are double-quoted, so
/// multi-line zone text survives a standard CSV reader.
pub fn to_csv(results: &[ZoneResult]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for row in table_rows(results) {
        writer.write_record([
            row.page.to_string(),
            row.zone.to_string(),
            row.text,
            row.coordinates,
        ])?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
