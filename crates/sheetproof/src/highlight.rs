//! Visual markers for flagged cells
//!
//! Each flagged cell keeps its style except for fill and border, which are
//! replaced according to its [`Severity`], and gets a comment listing the
//! findings. A comment the user already had on the cell is kept; the
//! findings go below a marker line so a later run can find and replace them.
//!
//! Applying the same reports twice leaves the workbook exactly as after the
//! first application.

use std::fmt::Write as _;

use sheetproof_core::{
    BorderLineStyle, BorderStyle, CellComment, Color, Error, FillStyle, IssueKind, Result,
    Workbook,
};
use sheetproof_grammar::SkipReason;

use crate::reconcile::{CellReport, Severity};

/// Author of the comments this crate writes
pub const ANNOTATION_AUTHOR: &str = "sheetproof";

/// Separates a user's own comment text from the findings appended to it
pub const ANNOTATION_MARKER: &str = "--- sheetproof findings ---";

const SPELLING_FILL: Color = Color::rgb(0xFF, 0xCC, 0xCC);
const GRAMMAR_FILL: Color = Color::rgb(0xCC, 0xCC, 0xFF);
const BOTH_FILL: Color = Color::rgb(0xFF, 0xCC, 0xFF);

/// Border shade relative to the fill
const BORDER_SHADE: f64 = 0.6;

impl Severity {
    /// Background fill for cells of this severity
    pub fn fill_color(&self) -> Color {
        match self {
            Severity::Spelling => SPELLING_FILL,
            Severity::Grammar => GRAMMAR_FILL,
            Severity::Both => BOTH_FILL,
        }
    }

    /// Outline color, a darker shade of the fill
    pub fn border_color(&self) -> Color {
        self.fill_color().darken(BORDER_SHADE)
    }

    /// Short description of the treatment
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Spelling => "light red: spelling",
            Severity::Grammar => "light blue: grammar",
            Severity::Both => "light magenta: spelling and grammar",
        }
    }

    /// One line per severity, describing its fill
    pub fn legend() -> String {
        Severity::ALL
            .iter()
            .map(|s| format!("{} (#{})", s.label(), s.fill_color().to_hex()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Highlighter options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Author recorded on new comments. Default: "sheetproof".
    pub author: String,
    /// Suggestions listed per issue. Default: 3.
    pub max_suggestions: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            author: ANNOTATION_AUTHOR.to_string(),
            max_suggestions: 3,
        }
    }
}

/// Applies fills, borders and comments to flagged cells
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    options: HighlightOptions,
}

impl Highlighter {
    pub fn new(options: HighlightOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Mark every reported cell, returning how many were marked
    ///
    /// Fails with [`Error::SheetNotFound`] before touching anything if a
    /// report names a sheet the workbook does not have.
    pub fn apply(&self, workbook: &mut Workbook, reports: &[CellReport]) -> Result<usize> {
        if let Some(missing) = reports
            .iter()
            .find(|r| workbook.worksheet_by_name(&r.sheet).is_none())
        {
            return Err(Error::SheetNotFound(missing.sheet.clone()));
        }

        for report in reports {
            let sheet = workbook
                .worksheet_by_name_mut(&report.sheet)
                .ok_or_else(|| Error::SheetNotFound(report.sheet.clone()))?;

            let mut style = sheet.cell_style_at(report.row, report.col).clone();
            style.fill = FillStyle::solid(report.severity.fill_color());
            style.border = BorderStyle::outline(BorderLineStyle::Thin, report.severity.border_color());
            sheet.set_cell_style_at(report.row, report.col, &style)?;

            let annotation = self.annotation(report);
            let comment = match sheet.comment_at(report.row, report.col) {
                Some(existing) => self.merge(existing, annotation),
                None => CellComment::new(self.options.author.clone(), annotation),
            };
            sheet.set_comment_at(report.row, report.col, comment);
        }

        tracing::debug!(
            "Highlighted {} cells in {}",
            reports.len(),
            workbook.file_name()
        );
        Ok(reports.len())
    }

    /// Text of the findings comment for one cell
    pub fn annotation(&self, report: &CellReport) -> String {
        let mut text = String::new();
        for issue in &report.issues {
            let kind = match issue.kind {
                IssueKind::Spelling => "Spelling",
                IssueKind::Grammar => "Grammar",
            };
            let _ = write!(
                text,
                "{kind} \"{}\": {}",
                report.excerpt(issue),
                issue.message
            );
            let shown: Vec<&str> = issue
                .suggestions
                .iter()
                .take(self.options.max_suggestions)
                .map(String::as_str)
                .collect();
            if !shown.is_empty() {
                let _ = write!(text, " (try: {})", shown.join(", "));
            }
            text.push('\n');
        }

        match report.grammar_status.skip_reason() {
            None | Some(SkipReason::Disabled) => {}
            Some(reason) => {
                let _ = writeln!(text, "Grammar not checked: {reason}");
            }
        }

        text.truncate(text.trim_end().len());
        text
    }

    fn merge(&self, existing: &CellComment, annotation: String) -> CellComment {
        let own = existing.author == self.options.author && !existing.text.contains(ANNOTATION_MARKER);
        if own {
            return CellComment {
                text: annotation,
                ..existing.clone()
            };
        }

        let user_text = match existing.text.find(ANNOTATION_MARKER) {
            Some(pos) => existing.text[..pos].trim_end(),
            None => existing.text.trim_end(),
        };
        CellComment {
            text: format!("{user_text}\n{ANNOTATION_MARKER}\n{annotation}"),
            ..existing.clone()
        }
    }
}
