//! # sheetproof
//!
//! Spelling and grammar proofreading for spreadsheets.
//!
//! A run takes already-parsed workbooks, checks every cell holding free text,
//! and hands each workbook back with flagged cells highlighted and annotated,
//! together with a [`RunSummary`] of what was found.
//!
//! The stages, in order:
//!
//! 1. [`extract`] - cells with checkable text become [`TextUnit`]s
//! 2. spelling ([`SpellChecker`]) and grammar ([`GrammarChecker`]) run
//!    concurrently over the units
//! 3. [`reconcile`] - both issue streams merge into one [`CellReport`] per
//!    flagged cell
//! 4. [`Highlighter`] - flagged cells get a fill, a border and a comment
//! 5. [`SummaryBuilder`] - counts and the flat findings list
//!
//! [`Pipeline`] drives all of it for a batch of documents.
//!
//! ## Example
//!
//! ```rust
//! use sheetproof::prelude::*;
//!
//! let mut workbook = Workbook::new("notes.xlsx");
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("A1", "Recieve the invoice").unwrap();
//!
//! let units: Vec<TextUnit> = extract(&workbook).collect();
//! let spelling = SpellChecker::default().check(&units[0].text, Language::EnUs).unwrap();
//! let report = reconcile(&units[0], spelling, Vec::new(), GrammarStatus::Checked).unwrap();
//!
//! Highlighter::default().apply(&mut workbook, &[report]).unwrap();
//! let sheet = workbook.worksheet(0).unwrap();
//! assert!(sheet.comment("A1").unwrap().is_some());
//! ```

pub mod extract;
pub mod highlight;
pub mod pipeline;
pub mod prelude;
pub mod reconcile;
pub mod summary;

pub use extract::extract;
pub use highlight::{HighlightOptions, Highlighter};
pub use pipeline::{
    checked_file_name, DocumentResult, Pipeline, PipelineError, RunContext, Submission,
};
pub use reconcile::{reconcile, CellReport, Severity};
pub use summary::{
    FailureKind, RunStatus, RunSummary, SheetCounts, SkippedCell, SummaryBuilder, Totals,
};

// Re-export core types
pub use sheetproof_core::{
    BorderEdge, BorderLineStyle, BorderStyle, CellAddress, CellComment, CellData, CellError,
    CellValue, Color, Error, FillStyle, FontStyle, Issue, IssueKind, Language, Result, RuleRef,
    Style, StylePool, TextUnit, Workbook, Worksheet, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export checker types
pub use sheetproof_grammar::{
    CancellationToken, CheckFailure, CheckRequest, GrammarChecker, GrammarConfig, GrammarOutcome,
    GrammarService, GrammarStatus, LanguageToolClient, LanguageToolConfig, RetryPolicy,
    ServiceError, ServiceMatch, SkipReason, Throttle, ThrottleConfig, PUBLIC_API_URL,
};
pub use sheetproof_spell::{Dictionary, SpellChecker, SpellConfig, SpellError};

// Re-export I/O types
pub use sheetproof_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, FindingRow, ReportWriter,
};
