//! Batch orchestration
//!
//! A run processes documents one after another. Within a document,
//! spelling (on a blocking task) and grammar (network-bound) run
//! concurrently; once both are done the results are reconciled in document
//! order, the workbook is highlighted, and the summary is built.
//!
//! A document that fails is handed back untouched with a `Failed` summary
//! and the run moves on. After cancellation the current document and every
//! remaining one are handed back untouched with a `Cancelled` summary.

use std::path::Path;
use std::sync::Arc;

use sheetproof_core::{Language, TextUnit, Workbook};
use sheetproof_grammar::{
    CancellationToken, GrammarChecker, GrammarOutcome, GrammarService, GrammarStatus, SkipReason,
};
use sheetproof_spell::{SpellChecker, SpellError};
use thiserror::Error;

use crate::extract::extract;
use crate::highlight::Highlighter;
use crate::reconcile::reconcile;
use crate::summary::{FailureKind, RunSummary, SummaryBuilder};

/// Fatal errors for a single document
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested language could not be parsed
    #[error("{0}")]
    Language(#[source] sheetproof_core::Error),

    /// The spelling checker could not check this language
    #[error(transparent)]
    Spelling(#[from] SpellError),

    /// Highlighting could not be applied
    #[error("Highlighting failed: {0}")]
    Highlight(#[source] sheetproof_core::Error),

    /// A checking task panicked or was aborted
    #[error("Checking task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// How the failure is reported in the summary
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Language(_) | PipelineError::Spelling(_) => FailureKind::Configuration,
            PipelineError::Highlight(_) | PipelineError::Task(_) => FailureKind::Internal,
        }
    }
}

/// One document to check
#[derive(Debug, Clone)]
pub struct Submission {
    pub workbook: Workbook,
    /// Locale code, e.g. "en-US"
    pub language: String,
}

impl Submission {
    pub fn new(workbook: Workbook, language: impl Into<String>) -> Self {
        Self {
            workbook,
            language: language.into(),
        }
    }
}

/// A document handed back by the run
#[derive(Debug, Clone)]
pub struct DocumentResult {
    /// Highlighted if the run completed, otherwise exactly as submitted
    pub workbook: Workbook,
    pub summary: RunSummary,
}

impl DocumentResult {
    fn cancelled(submission: Submission) -> Self {
        let summary =
            RunSummary::cancelled(submission.workbook.file_name(), &submission.language);
        Self {
            workbook: submission.workbook,
            summary,
        }
    }
}

/// Per-run state shared with the caller
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub cancel: CancellationToken,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Runs documents through extraction, checking, highlighting and summary
pub struct Pipeline<S> {
    spell: Arc<SpellChecker>,
    grammar: Option<GrammarChecker<S>>,
    highlighter: Highlighter,
}

impl<S: GrammarService> Pipeline<S> {
    /// A pipeline that checks spelling only
    pub fn new(spell: SpellChecker) -> Self {
        Self {
            spell: Arc::new(spell),
            grammar: None,
            highlighter: Highlighter::default(),
        }
    }

    /// Check grammar with the given checker
    pub fn with_grammar(mut self, grammar: GrammarChecker<S>) -> Self {
        self.grammar = Some(grammar);
        self
    }

    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn grammar(&self) -> Option<&GrammarChecker<S>> {
        self.grammar.as_ref()
    }

    /// Check every submission, returning results in submission order
    pub async fn run(&self, submissions: Vec<Submission>, ctx: &RunContext) -> Vec<DocumentResult> {
        if let Some(grammar) = &self.grammar {
            grammar.begin_run();
        }

        let mut results = Vec::with_capacity(submissions.len());
        for submission in submissions {
            if ctx.is_cancelled() {
                results.push(DocumentResult::cancelled(submission));
                continue;
            }
            results.push(self.process(submission, ctx).await);
        }

        let failed = results.iter().filter(|r| r.summary.is_failed()).count();
        tracing::info!("Run finished: {} documents, {failed} failed", results.len());
        results
    }

    /// Check a single document
    pub async fn process(&self, submission: Submission, ctx: &RunContext) -> DocumentResult {
        let Submission {
            mut workbook,
            language,
        } = submission;

        let summary = match self.check_document(&mut workbook, &language, ctx).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Failed to check {}: {e}", workbook.file_name());
                RunSummary::failed(workbook.file_name(), &language, e.kind(), e.to_string())
            }
        };

        DocumentResult { workbook, summary }
    }

    async fn check_document(
        &self,
        workbook: &mut Workbook,
        code: &str,
        ctx: &RunContext,
    ) -> Result<RunSummary, PipelineError> {
        let language: Language = code.parse().map_err(PipelineError::Language)?;
        if self.spell.dictionary(language).is_none() {
            return Err(SpellError::MissingDictionary(language).into());
        }

        let units: Arc<Vec<TextUnit>> = Arc::new(extract(workbook).collect());
        tracing::info!(
            "Checking {} cells in {} ({language})",
            units.len(),
            workbook.file_name()
        );

        let spell = Arc::clone(&self.spell);
        let spell_units = Arc::clone(&units);
        let spelling = tokio::task::spawn_blocking(move || {
            spell_units
                .iter()
                .map(|unit| spell.check_unit(unit, language))
                .collect::<Result<Vec<_>, SpellError>>()
        });
        let grammar = self.grammar_outcomes(&units, language, &ctx.cancel);

        let (spelling, grammar) = tokio::join!(spelling, grammar);
        let spelling = spelling.map_err(|e| PipelineError::Task(e.to_string()))??;

        if ctx.is_cancelled() {
            tracing::info!("Run cancelled, leaving {} unchanged", workbook.file_name());
            return Ok(RunSummary::cancelled(workbook.file_name(), code));
        }

        let mut builder = SummaryBuilder::new(workbook.file_name(), language);
        for ((unit, spelling), outcome) in units.iter().zip(spelling).zip(grammar) {
            let report = reconcile(unit, spelling, outcome.issues, outcome.status);
            builder.record(unit, outcome.status, report);
        }
        let summary = builder.build();

        self.highlighter
            .apply(workbook, &summary.reports)
            .map_err(PipelineError::Highlight)?;

        tracing::debug!(
            "{}: {} of {} cells flagged",
            summary.file_name,
            summary.totals.cells_flagged,
            summary.totals.cells_checked
        );
        Ok(summary)
    }

    async fn grammar_outcomes(
        &self,
        units: &[TextUnit],
        language: Language,
        cancel: &CancellationToken,
    ) -> Vec<GrammarOutcome> {
        match &self.grammar {
            Some(grammar) => grammar.check_units(units, language, cancel).await,
            None => vec![
                GrammarOutcome {
                    issues: Vec::new(),
                    status: GrammarStatus::Skipped(SkipReason::Disabled),
                };
                units.len()
            ],
        }
    }
}

/// Name for the annotated copy of a document
///
/// `report.xlsx` becomes `report_checked.xlsx`; a name without an extension
/// just gets the suffix. Any directory part is kept.
pub fn checked_file_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_checked.{}", ext.to_string_lossy()),
        None => format!("{stem}_checked"),
    };
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(name).to_string_lossy().into_owned()
        }
        _ => name,
    }
}
