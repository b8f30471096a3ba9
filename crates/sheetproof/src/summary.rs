//! Per-document run summaries

use std::fmt;

use serde::{Deserialize, Serialize};
use sheetproof_core::{CellAddress, IssueKind, Language, TextUnit};
use sheetproof_csv::FindingRow;
use sheetproof_grammar::{GrammarStatus, SkipReason};

use crate::reconcile::{CellReport, Severity};

/// Category of a fatal per-document error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Bad input to the run, such as an unsupported language
    Configuration,
    /// The document itself could not be processed
    Data,
    /// A bug or a crashed task
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Configuration => "configuration error",
            FailureKind::Data => "data error",
            FailureKind::Internal => "internal error",
        })
    }
}

/// How processing of a document ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed { kind: FailureKind, message: String },
    Cancelled,
}

/// Counts for one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetCounts {
    pub sheet: String,
    pub cells_checked: usize,
    /// Cells flagged for spelling only
    pub spelling: usize,
    /// Cells flagged for grammar only
    pub grammar: usize,
    /// Cells flagged for both
    pub both: usize,
}

impl SheetCounts {
    fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            ..Default::default()
        }
    }

    pub fn flagged(&self) -> usize {
        self.spelling + self.grammar + self.both
    }
}

/// A cell whose grammar check did not happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCell {
    pub sheet: String,
    pub row: u32,
    pub col: u16,
    pub reason: SkipReason,
}

impl SkippedCell {
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

/// Document-wide totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub cells_checked: usize,
    pub cells_flagged: usize,
    pub spelling_issues: usize,
    pub grammar_issues: usize,
    /// Cells whose grammar check was skipped (not counting a disabled checker)
    pub grammar_skipped: usize,
}

/// What one run found in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub file_name: String,
    /// Locale code as requested
    pub language: String,
    pub status: RunStatus,
    /// Sheets that had checkable text, in document order
    pub sheets: Vec<SheetCounts>,
    /// Flagged cells in document order
    pub reports: Vec<CellReport>,
    /// Cells whose grammar check was skipped, in document order
    pub skipped: Vec<SkippedCell>,
    pub totals: Totals,
}

impl RunSummary {
    fn empty(file_name: &str, language: &str, status: RunStatus) -> Self {
        Self {
            file_name: file_name.to_string(),
            language: language.to_string(),
            status,
            sheets: Vec::new(),
            reports: Vec::new(),
            skipped: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// Summary for a document that could not be processed
    pub fn failed(
        file_name: &str,
        language: &str,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self::empty(
            file_name,
            language,
            RunStatus::Failed {
                kind,
                message: message.into(),
            },
        )
    }

    /// Summary for a document the run was cancelled before finishing
    pub fn cancelled(file_name: &str, language: &str) -> Self {
        Self::empty(file_name, language, RunStatus::Cancelled)
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, RunStatus::Failed { .. })
    }

    /// Completed with nothing flagged
    pub fn is_clean(&self) -> bool {
        self.is_completed() && self.reports.is_empty()
    }

    /// One row per issue, in document order
    pub fn finding_rows(&self) -> Vec<FindingRow> {
        self.reports
            .iter()
            .flat_map(|report| {
                let cell = report.address().to_a1_string();
                let grammar_status = match report.grammar_status {
                    GrammarStatus::Checked => "checked",
                    GrammarStatus::Skipped(reason) => reason.code(),
                };
                report.issues.iter().map(move |issue| FindingRow {
                    file: self.file_name.clone(),
                    sheet: report.sheet.clone(),
                    cell: cell.clone(),
                    severity: report.severity.to_string(),
                    kind: issue.kind.to_string(),
                    start: issue.start,
                    end: issue.end,
                    excerpt: report.excerpt(issue).to_string(),
                    message: issue.message.clone(),
                    suggestions: issue.suggestions.join("; "),
                    rule: issue.rule.as_ref().map(|r| r.id.clone()).unwrap_or_default(),
                    grammar_status: grammar_status.to_string(),
                    text: report.text.clone(),
                })
            })
            .collect()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.file_name, self.language)?;
        match &self.status {
            RunStatus::Failed { kind, message } => return writeln!(f, "failed, {kind}: {message}"),
            RunStatus::Cancelled => return writeln!(f, "cancelled"),
            RunStatus::Completed => {}
        }

        let totals = &self.totals;
        writeln!(
            f,
            "{} of {} cells flagged ({} spelling, {} grammar issues)",
            totals.cells_flagged, totals.cells_checked, totals.spelling_issues, totals.grammar_issues
        )?;

        for counts in &self.sheets {
            writeln!(
                f,
                "  {}: {} checked, {} spelling, {} grammar, {} both",
                counts.sheet, counts.cells_checked, counts.spelling, counts.grammar, counts.both
            )?;
            for report in self.reports.iter().filter(|r| r.sheet == counts.sheet) {
                writeln!(f, "    {} [{}] {}", report.address(), report.severity, report.text)?;
                for issue in &report.issues {
                    write!(f, "      - \"{}\": {}", report.excerpt(issue), issue.message)?;
                    if !issue.suggestions.is_empty() {
                        write!(f, " (try: {})", issue.suggestions.join(", "))?;
                    }
                    writeln!(f)?;
                }
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f, "  Grammar not checked for {} cells:", self.skipped.len())?;
            for cell in &self.skipped {
                writeln!(f, "    {}!{}: {}", cell.sheet, cell.address(), cell.reason)?;
            }
        }

        if !self.reports.is_empty() {
            writeln!(f, "  Legend:")?;
            for line in Severity::legend().lines() {
                writeln!(f, "    {line}")?;
            }
        }
        Ok(())
    }
}

/// Accumulates a [`RunSummary`] one unit at a time
#[derive(Debug)]
pub struct SummaryBuilder {
    file_name: String,
    language: Language,
    sheets: Vec<SheetCounts>,
    reports: Vec<CellReport>,
    skipped: Vec<SkippedCell>,
}

impl SummaryBuilder {
    pub fn new(file_name: impl Into<String>, language: Language) -> Self {
        Self {
            file_name: file_name.into(),
            language,
            sheets: Vec::new(),
            reports: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record one checked unit; call in document order
    pub fn record(&mut self, unit: &TextUnit, grammar: GrammarStatus, report: Option<CellReport>) {
        // Units of a sheet arrive together, so only the last sheet can match
        if self.sheets.last().map_or(true, |s| s.sheet != unit.sheet) {
            self.sheets.push(SheetCounts::new(&unit.sheet));
        }
        let last = self.sheets.len() - 1;
        let counts = &mut self.sheets[last];
        counts.cells_checked += 1;

        if let Some(report) = report {
            match report.severity {
                Severity::Spelling => counts.spelling += 1,
                Severity::Grammar => counts.grammar += 1,
                Severity::Both => counts.both += 1,
            }
            self.reports.push(report);
        }

        match grammar.skip_reason() {
            None | Some(SkipReason::Disabled) => {}
            Some(reason) => self.skipped.push(SkippedCell {
                sheet: unit.sheet.clone(),
                row: unit.row,
                col: unit.col,
                reason,
            }),
        }
    }

    /// Finish with a `Completed` status
    pub fn build(self) -> RunSummary {
        let issues = |kind: IssueKind| {
            self.reports
                .iter()
                .map(|r| r.issues_of(kind).count())
                .sum::<usize>()
        };
        let totals = Totals {
            cells_checked: self.sheets.iter().map(|s| s.cells_checked).sum(),
            cells_flagged: self.reports.len(),
            spelling_issues: issues(IssueKind::Spelling),
            grammar_issues: issues(IssueKind::Grammar),
            grammar_skipped: self.skipped.len(),
        };

        RunSummary {
            file_name: self.file_name,
            language: self.language.code().to_string(),
            status: RunStatus::Completed,
            sheets: self.sheets,
            reports: self.reports,
            skipped: self.skipped,
            totals,
        }
    }
}
