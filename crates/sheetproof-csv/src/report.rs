//! Findings export
//!
//! One row per issue, flattened from the per-cell reports. Columns, in
//! order:
//!
//! | Column           | Description                                        |
//! |------------------|----------------------------------------------------|
//! | `file`           | Document file name                                 |
//! | `sheet`          | Sheet name                                         |
//! | `cell`           | A1 address                                         |
//! | `severity`       | `spelling`, `grammar` or `both` for the whole cell |
//! | `kind`           | `spelling` or `grammar` for this issue             |
//! | `start`, `end`   | Character offsets in the cell text                 |
//! | `excerpt`        | The flagged text                                   |
//! | `message`        | Issue description                                  |
//! | `suggestions`    | Replacements, separated by `; `                    |
//! | `rule`           | Grammar rule id, empty for spelling                |
//! | `grammar_status` | `checked` or the reason grammar was skipped        |
//! | `text`           | The full cell text                                 |
//!
//! Optional columns are empty strings, never omitted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::CsvResult;
use crate::options::CsvWriteOptions;

const HEADER: [&str; 13] = [
    "file",
    "sheet",
    "cell",
    "severity",
    "kind",
    "start",
    "end",
    "excerpt",
    "message",
    "suggestions",
    "rule",
    "grammar_status",
    "text",
];

/// One exported finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingRow {
    pub file: String,
    pub sheet: String,
    pub cell: String,
    pub severity: String,
    pub kind: String,
    pub start: usize,
    pub end: usize,
    pub excerpt: String,
    pub message: String,
    pub suggestions: String,
    pub rule: String,
    pub grammar_status: String,
    /// Full cell text
    pub text: String,
}

/// Writes findings as CSV
pub struct ReportWriter;

impl ReportWriter {
    /// Write findings to a file, returning the number of rows written
    pub fn write_file<P: AsRef<Path>>(
        rows: &[FindingRow],
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<usize> {
        let file = File::create(path)?;
        Self::write(rows, BufWriter::new(file), options)
    }

    /// Write findings to a writer, returning the number of rows written
    pub fn write<W: Write>(
        rows: &[FindingRow],
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<usize> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .terminator(options.line_terminator.to_csv())
            .has_headers(false)
            .from_writer(writer);

        // Header is written by hand so that it appears even with zero rows
        if options.write_header {
            csv_writer.write_record(HEADER)?;
        }
        for row in rows {
            csv_writer.serialize(row)?;
        }

        csv_writer.flush()?;
        Ok(rows.len())
    }
}
