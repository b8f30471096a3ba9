//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use sheetproof_core::{CellValue, Workbook, Worksheet, MAX_SHEET_NAME_LEN};

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

/// CSV file reader
///
/// A CSV file becomes a workbook with a single sheet. Every row, the first
/// one included, is stored as ordinary cells, so header text is proofread
/// like the rest.
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a workbook named after the file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path)?;
        Self::read(file, &file_name, options)
    }

    /// Read CSV from a reader into a workbook
    pub fn read<R: Read>(reader: R, file_name: &str, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let sheet_name = options
            .sheet_name
            .clone()
            .unwrap_or_else(|| sheet_name_for(file_name));
        let mut worksheet = Worksheet::new(sheet_name);

        for (row_idx, result) in csv_reader.byte_records().enumerate() {
            let record = result?;
            let row = u32::try_from(row_idx)
                .map_err(|_| CsvError::TooLarge(format!("row {}", row_idx + 1)))?;

            for (col_idx, field) in record.iter().enumerate() {
                let col = u16::try_from(col_idx)
                    .map_err(|_| CsvError::TooLarge(format!("column {}", col_idx + 1)))?;

                let value = match std::str::from_utf8(field) {
                    Ok(text) if options.auto_detect_types => Self::detect_type(text),
                    Ok(text) if text.is_empty() => CellValue::Empty,
                    Ok(text) => CellValue::string(text),
                    Err(_) => CellValue::Undecodable(field.to_vec()),
                };
                if !value.is_empty() {
                    worksheet.set_cell_value_at(row, col, value)?;
                }
            }
        }

        let mut workbook = Workbook::empty(file_name);
        workbook.add_existing_worksheet(worksheet)?;
        Ok(workbook)
    }

    /// Detect the type of a field value
    ///
    /// Text keeps its original spacing; only the detection looks at the
    /// trimmed field.
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if let Some(formula) = trimmed.strip_prefix('=') {
            if !formula.is_empty() {
                return CellValue::formula(trimmed);
            }
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return CellValue::Boolean(true),
            "false" => return CellValue::Boolean(false),
            _ => {}
        }

        // f64 parsing also accepts words like "inf" and "NaN"
        if trimmed.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return CellValue::Number(n);
            }
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return CellValue::Date(dt);
                }
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
                return CellValue::Date(dt);
            }
        }

        CellValue::string(field)
    }
}

/// A valid sheet name derived from a file name
fn sheet_name_for(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name: String = stem
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if name.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        name
    }
}
