//! Issue reconciliation
//!
//! Spelling and grammar run independently and may flag the same words. The
//! two streams are merged per cell with one rule: a spelling issue lying
//! entirely inside a grammar issue is dropped, since the grammar message
//! already covers that text. Partial overlaps keep both issues.

use std::fmt;

use serde::{Deserialize, Serialize};
use sheetproof_core::{CellAddress, Issue, IssueKind, TextUnit};
use sheetproof_grammar::GrammarStatus;

/// Which kinds of issue a flagged cell has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Spelling,
    Grammar,
    Both,
}

impl Severity {
    /// Classify from the kinds present; `None` when there are no issues
    pub fn classify(has_spelling: bool, has_grammar: bool) -> Option<Self> {
        match (has_spelling, has_grammar) {
            (true, true) => Some(Severity::Both),
            (true, false) => Some(Severity::Spelling),
            (false, true) => Some(Severity::Grammar),
            (false, false) => None,
        }
    }

    /// Every severity, in display order
    pub const ALL: [Severity; 3] = [Severity::Spelling, Severity::Grammar, Severity::Both];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Spelling => "spelling",
            Severity::Grammar => "grammar",
            Severity::Both => "both",
        })
    }
}

/// Everything found in one flagged cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub sheet: String,
    pub row: u32,
    pub col: u16,
    /// The cell text the offsets refer to
    pub text: String,
    /// Ordered by (start, end, kind)
    pub issues: Vec<Issue>,
    pub severity: Severity,
    pub grammar_status: GrammarStatus,
}

impl CellReport {
    /// The cell's address
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Issues of one kind
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// The text an issue covers
    pub fn excerpt(&self, issue: &Issue) -> &str {
        let mut chars = self.text.char_indices().map(|(i, _)| i);
        let from = chars.nth(issue.start).unwrap_or(self.text.len());
        let to = match issue.len() {
            0 => from,
            n => self
                .text
                .char_indices()
                .map(|(i, _)| i)
                .nth(issue.start + n)
                .unwrap_or(self.text.len()),
        };
        &self.text[from..to]
    }
}

/// Merge one cell's spelling and grammar issues
///
/// Returns `None` when no issue survives. Issues whose offsets do not fit
/// the cell text are discarded with a warning.
pub fn reconcile(
    unit: &TextUnit,
    spelling: Vec<Issue>,
    grammar: Vec<Issue>,
    grammar_status: GrammarStatus,
) -> Option<CellReport> {
    let char_len = unit.char_len();
    let valid = |issue: &Issue| {
        let ok = issue.fits(char_len);
        if !ok {
            tracing::warn!(
                "Discarding {} issue at {}..{} in {}!{}: cell text has {char_len} characters",
                issue.kind,
                issue.start,
                issue.end,
                unit.sheet,
                unit.address()
            );
        }
        ok
    };

    let grammar: Vec<Issue> = grammar.into_iter().filter(|i| valid(i)).collect();
    let mut issues: Vec<Issue> = spelling
        .into_iter()
        .filter(|i| valid(i))
        .filter(|s| !grammar.iter().any(|g| g.contains(s)))
        .collect();
    issues.extend(grammar);

    // Message and rule break ties so identical findings end up adjacent
    issues.sort_by(|a, b| dedup_key(a).cmp(&dedup_key(b)));
    issues.dedup_by(|a, b| dedup_key(a) == dedup_key(b));

    let severity = Severity::classify(
        issues.iter().any(|i| i.kind == IssueKind::Spelling),
        issues.iter().any(|i| i.kind == IssueKind::Grammar),
    )?;

    Some(CellReport {
        sheet: unit.sheet.clone(),
        row: unit.row,
        col: unit.col,
        text: unit.text.clone(),
        issues,
        severity,
        grammar_status,
    })
}

/// Two issues are the same finding when every part of this key matches
fn dedup_key(issue: &Issue) -> (usize, usize, IssueKind, &str, Option<(&str, &str)>) {
    (
        issue.start,
        issue.end,
        issue.kind,
        issue.message.as_str(),
        issue
            .rule
            .as_ref()
            .map(|r| (r.id.as_str(), r.category.as_str())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use sheetproof_grammar::SkipReason;

    fn unit(text: &str) -> TextUnit {
        TextUnit::new("Sheet1", 0, 0, text)
    }

    fn spans(report: &CellReport) -> Vec<(IssueKind, usize, usize)> {
        report.issues.iter().map(|i| (i.kind, i.start, i.end)).collect()
    }

    #[test]
    fn test_no_issues_no_report() {
        assert!(reconcile(&unit("All good"), vec![], vec![], GrammarStatus::Checked).is_none());
    }

    #[test]
    fn test_contained_spelling_dropped() {
        // "Thsi is bad": grammar flags the whole clause, spelling flags "Thsi"
        let report = reconcile(
            &unit("Thsi is bad"),
            vec![Issue::spelling(0, 4, vec!["This".into()])],
            vec![Issue::grammar(0, 11, "Sentence fragment")],
            GrammarStatus::Checked,
        )
        .unwrap();

        assert_eq!(spans(&report), vec![(IssueKind::Grammar, 0, 11)]);
        assert_eq!(report.severity, Severity::Grammar);
    }

    #[test]
    fn test_partial_overlap_keeps_both() {
        let report = reconcile(
            &unit("Thsi is bad"),
            vec![Issue::spelling(0, 4, vec![])],
            vec![Issue::grammar(2, 7, "odd")],
            GrammarStatus::Checked,
        )
        .unwrap();

        assert_eq!(
            spans(&report),
            vec![(IssueKind::Spelling, 0, 4), (IssueKind::Grammar, 2, 7)]
        );
        assert_eq!(report.severity, Severity::Both);
    }

    #[test]
    fn test_ordering_by_start_end_kind() {
        let report = reconcile(
            &unit("aaaa bbbb cccc"),
            vec![Issue::spelling(10, 14, vec![]), Issue::spelling(0, 4, vec![])],
            vec![Issue::grammar(5, 9, "x"), Issue::grammar(0, 3, "y")],
            GrammarStatus::Checked,
        )
        .unwrap();

        assert_eq!(
            spans(&report),
            vec![
                (IssueKind::Grammar, 0, 3),
                (IssueKind::Spelling, 0, 4),
                (IssueKind::Grammar, 5, 9),
                (IssueKind::Spelling, 10, 14),
            ]
        );
    }

    #[test]
    fn test_same_span_grammar_issues_kept() {
        let report = reconcile(
            &unit("He go home"),
            vec![],
            vec![
                Issue::grammar(3, 5, "Possible agreement error"),
                Issue::grammar(3, 5, "Verb tense may be wrong"),
                Issue::grammar(3, 5, "Possible agreement error"),
            ],
            GrammarStatus::Checked,
        )
        .unwrap();

        let messages: Vec<&str> = report.issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["Possible agreement error", "Verb tense may be wrong"]);
    }

    #[test]
    fn test_same_message_different_rules_kept() {
        let first = Issue::grammar(3, 5, "Check this verb").with_rule("HE_VERB_AGR", "GRAMMAR");
        let second = Issue::grammar(3, 5, "Check this verb").with_rule("VERB_FORM", "GRAMMAR");

        let report = reconcile(
            &unit("He go home"),
            vec![Issue::spelling(3, 5, vec![]), Issue::spelling(3, 5, vec![])],
            vec![second, first.clone(), first],
            GrammarStatus::Checked,
        )
        .unwrap();

        // The spelling issues sit inside the grammar spans and are dropped
        let rules: Vec<&str> = report
            .issues
            .iter()
            .filter_map(|i| i.rule.as_ref().map(|r| r.id.as_str()))
            .collect();
        assert_eq!(rules, vec!["HE_VERB_AGR", "VERB_FORM"]);
        assert_eq!(report.severity, Severity::Grammar);
    }

    #[test]
    fn test_invalid_offsets_discarded() {
        let report = reconcile(
            &unit("short"),
            vec![Issue::spelling(0, 5, vec![])],
            vec![Issue::grammar(3, 40, "overflow"), Issue::grammar(2, 2, "empty")],
            GrammarStatus::Checked,
        )
        .unwrap();

        assert_eq!(spans(&report), vec![(IssueKind::Spelling, 0, 5)]);
        assert_eq!(report.severity, Severity::Spelling);
    }

    #[test]
    fn test_only_invalid_issues_means_no_report() {
        assert!(reconcile(
            &unit("abc"),
            vec![Issue::spelling(2, 9, vec![])],
            vec![],
            GrammarStatus::Checked
        )
        .is_none());
    }

    #[test]
    fn test_grammar_status_carried() {
        let status = GrammarStatus::Skipped(SkipReason::RateLimited);
        let report = reconcile(
            &unit("Recieve"),
            vec![Issue::spelling(0, 7, vec!["Receive".into()])],
            vec![],
            status,
        )
        .unwrap();
        assert_eq!(report.grammar_status, status);
    }

    #[test]
    fn test_excerpt() {
        let report = reconcile(
            &unit("café recieve"),
            vec![Issue::spelling(5, 12, vec![])],
            vec![],
            GrammarStatus::Checked,
        )
        .unwrap();
        assert_eq!(report.excerpt(&report.issues[0]), "recieve");
        assert_eq!(report.address().to_a1_string(), "A1");
    }

    #[test]
    fn test_severity_classify() {
        assert_eq!(Severity::classify(true, true), Some(Severity::Both));
        assert_eq!(Severity::classify(false, false), None);
    }

    proptest! {
        #[test]
        fn prop_reconciled_issues_are_valid_and_ordered(
            text in "[a-z ]{0,40}",
            spelling in proptest::collection::vec((0usize..50, 0usize..10), 0..8),
            grammar in proptest::collection::vec((0usize..50, 0usize..20), 0..8),
        ) {
            let unit = unit(&text);
            let spelling: Vec<Issue> = spelling
                .into_iter()
                .map(|(start, len)| Issue::spelling(start, start + len, vec![]))
                .collect();
            let grammar: Vec<Issue> = grammar
                .into_iter()
                .map(|(start, len)| Issue::grammar(start, start + len, "g"))
                .collect();

            if let Some(report) = reconcile(&unit, spelling, grammar, GrammarStatus::Checked) {
                let len = unit.char_len();
                prop_assert!(!report.issues.is_empty());
                prop_assert!(report.issues.iter().all(|i| i.fits(len)));
                prop_assert!(report
                    .issues
                    .windows(2)
                    .all(|w| (w[0].start, w[0].end, w[0].kind) <= (w[1].start, w[1].end, w[1].kind)));
                for s in report.issues_of(IssueKind::Spelling) {
                    prop_assert!(!report.issues_of(IssueKind::Grammar).any(|g| g.contains(s)));
                }
            }
        }
    }
}
