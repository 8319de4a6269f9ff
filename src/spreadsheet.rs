//! Writing a [`ResultTable`] out as an `.xlsx` workbook

use crate::config::OutputConfig;
use crate::error::Result;
use crate::types::{COLUMN_HEADERS, ResultTable, SpreadsheetArtifact};
use crate::utils::{timestamped_filename, truncate_chars};
use chrono::Utc;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};
use tracing::{debug, warn};

/// Longest text Excel accepts in one cell
pub const MAX_CELL_CHARS: usize = 32_767;

/// Serialize `table` into a single-sheet workbook.
///
/// The first row is always [`COLUMN_HEADERS`]; each record follows in table
/// order. Every cell is written as text. Empty values become blank cells and
/// values over [`MAX_CELL_CHARS`] are cut to fit.
///
/// # Errors
///
/// Returns [`Error::Spreadsheet`](crate::error::Error::Spreadsheet) if the sheet name is rejected or the table
/// exceeds Excel's row limit.
pub fn serialize(table: &ResultTable, output: &OutputConfig) -> Result<SpreadsheetArtifact> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&output.sheet_name)?;

    for (col, header) in (0u16..).zip(COLUMN_HEADERS) {
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, record) in table.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in (0u16..).zip(record.cells()) {
            if value.is_empty() {
                continue;
            }
            if value.chars().count() > MAX_CELL_CHARS {
                warn!(
                    user_id = %record.user_id,
                    column = COLUMN_HEADERS[usize::from(col)],
                    "Cell exceeds Excel's limit, truncating"
                );
                worksheet.write_string(row, col, truncate_chars(&value, MAX_CELL_CHARS))?;
            } else {
                worksheet.write_string(row, col, value)?;
            }
        }
    }

    worksheet.autofit();

    let bytes = workbook.save_to_buffer()?;
    let filename = timestamped_filename(&output.filename_prefix, Utc::now());

    debug!(
        rows = table.len(),
        bytes = bytes.len(),
        filename = %filename,
        "Serialized result table"
    );

    Ok(SpreadsheetArtifact { bytes, filename })
}
