//! Text extraction
//!
//! Walks a workbook and yields one [`TextUnit`] per cell holding free text.
//! Numbers, dates, booleans, errors and empty cells are data, not prose.
//! Formulas are checked through their cached text only: the formula source
//! is never proofread.

use sheetproof_core::{CellValue, TextUnit, Workbook};

/// Iterate over the checkable cells of a workbook
///
/// Sheets come in document order, cells in row-major order. Lazy and
/// side-effect free.
pub fn extract(workbook: &Workbook) -> impl Iterator<Item = TextUnit> + '_ {
    workbook.worksheets().flat_map(|sheet| {
        sheet.cells().filter_map(move |(row, col, cell)| {
            let text = checkable_text(&cell.value, sheet.name(), row, col)?;
            Some(TextUnit::new(sheet.name(), row, col, text))
        })
    })
}

/// The text of a cell, if it is worth checking
fn checkable_text<'a>(value: &'a CellValue, sheet: &str, row: u32, col: u16) -> Option<&'a str> {
    if let CellValue::Undecodable(bytes) = value {
        tracing::debug!(
            "Skipping undecodable cell {sheet}!{} ({} bytes)",
            sheetproof_core::CellAddress::new(row, col),
            bytes.len()
        );
        return None;
    }
    value.as_string().filter(|text| !text.trim().is_empty())
}
