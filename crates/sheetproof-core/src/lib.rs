//! # sheetproof-core
//!
//! Core data structures for the sheetproof spreadsheet proofreader.
//!
//! This crate provides the types shared by every checking stage:
//! - [`Workbook`], [`Worksheet`] - The document being proofread
//! - [`CellValue`] and [`CellAddress`] - Cell contents and A1 addressing
//! - [`Style`] and [`CellComment`] - The formatting the highlighter adds to
//! - [`Language`], [`TextUnit`], [`Issue`] - The vocabulary of a check run
//!
//! ## Example
//!
//! ```rust
//! use sheetproof_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new("inventory.xlsx");
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! // Using string addresses
//! sheet.set_cell_value("A1", "Recieve the invoice").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//!
//! // Or using row/column indices (0-based)
//! sheet.set_cell_value_at(1, 0, CellValue::string("Ship it")).unwrap();
//! ```

pub mod cell;
pub mod check;
pub mod comment;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellData, CellError, CellValue};
pub use check::{Issue, IssueKind, Language, RuleRef, TextUnit};
pub use comment::CellComment;
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

pub use style::{
    BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle, Style, StylePool,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
