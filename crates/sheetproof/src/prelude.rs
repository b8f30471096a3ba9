//! Prelude module - common imports for sheetproof users
//!
//! ```rust
//! use sheetproof::prelude::*;
//! ```

pub use crate::{
    // Pipeline
    checked_file_name,
    extract,
    reconcile,
    CancellationToken,
    CellReport,
    DocumentResult,
    Pipeline,
    PipelineError,
    RunContext,
    Submission,

    // Checkers
    GrammarChecker,
    GrammarConfig,
    GrammarService,
    GrammarStatus,
    LanguageToolClient,
    LanguageToolConfig,
    RetryPolicy,
    SkipReason,
    SpellChecker,
    SpellConfig,
    Throttle,
    ThrottleConfig,

    // Output
    HighlightOptions,
    Highlighter,
    RunStatus,
    RunSummary,
    Severity,

    // Document model
    CellAddress,
    CellComment,
    CellValue,
    Color,
    Error,
    Issue,
    IssueKind,
    Language,
    Result,
    Style,
    TextUnit,
    Workbook,
    Worksheet,

    // I/O types
    CsvReadOptions,
    CsvReader,
    ReportWriter,
};
