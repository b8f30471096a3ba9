//! # sheetproof-csv
//!
//! CSV input and output for sheetproof.
//!
//! - [`CsvReader`] loads a CSV file as a one-sheet [`Workbook`](sheetproof_core::Workbook)
//! - [`ReportWriter`] exports a flat list of findings as CSV

mod error;
mod options;
mod reader;
mod report;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use report::{FindingRow, ReportWriter};
