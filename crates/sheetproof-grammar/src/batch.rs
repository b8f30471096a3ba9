//! Batching of cells into grammar requests
//!
//! Short cells are joined into one request text, separated by a blank line
//! so the service treats them as separate paragraphs. Matches in the
//! response are mapped back to the cell they fall in, with offsets rebased
//! to that cell's text. Matches that cross a cell boundary, or fall in a
//! separator, belong to no cell and are dropped.

use sheetproof_core::{Issue, TextUnit};

use crate::service::ServiceMatch;

/// Text placed between cells in a batched request
pub const SEPARATOR: &str = "\n\n";

const SEPARATOR_CHARS: usize = 2;

/// Size limits for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Maximum request length in characters, separators included
    pub max_chars: usize,
    /// Maximum number of cells per request
    pub max_units: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_chars: 1500,
            max_units: 20,
        }
    }
}

/// Where one cell's text sits inside a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Index of the unit in the caller's list
    pub index: usize,
    /// Character offset of the unit's text in the batch text
    pub start: usize,
    /// Length of the unit's text in characters
    pub len: usize,
}

impl Member {
    fn end(&self) -> usize {
        self.start + self.len
    }
}

/// One request's worth of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Joined text sent to the service
    pub text: String,
    /// Cells in text order
    pub members: Vec<Member>,
    sheet: String,
    char_len: usize,
}

impl Batch {
    /// A batch holding a single unit
    pub fn single(index: usize, unit: &TextUnit) -> Self {
        let len = unit.char_len();
        Self {
            text: unit.text.clone(),
            members: vec![Member {
                index,
                start: 0,
                len,
            }],
            sheet: unit.sheet.clone(),
            char_len: len,
        }
    }

    /// Sheet every member belongs to
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Length of the joined text in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    fn accepts(&self, unit: &TextUnit, unit_len: usize, limits: &BatchLimits) -> bool {
        unit.sheet == self.sheet
            && self.members.len() < limits.max_units
            && self.char_len + SEPARATOR_CHARS + unit_len <= limits.max_chars
    }

    fn push(&mut self, index: usize, unit: &TextUnit, unit_len: usize) {
        self.text.push_str(SEPARATOR);
        let start = self.char_len + SEPARATOR_CHARS;
        self.text.push_str(&unit.text);
        self.members.push(Member {
            index,
            start,
            len: unit_len,
        });
        self.char_len = start + unit_len;
    }

    /// Map service matches to (unit index, issue) pairs
    ///
    /// Offsets in the returned issues are relative to the unit's own text and
    /// always satisfy `start < end <= unit length`.
    pub fn remap(&self, matches: Vec<ServiceMatch>) -> Vec<(usize, Issue)> {
        matches
            .into_iter()
            .filter_map(|m| {
                let Some(member) = self.member_containing(&m) else {
                    tracing::debug!(
                        "Dropping match at {}..{} outside any single cell",
                        m.offset,
                        m.end()
                    );
                    return None;
                };
                Some((member.index, rebase(m, member.start)))
            })
            .collect()
    }

    fn member_containing(&self, m: &ServiceMatch) -> Option<&Member> {
        if m.length == 0 {
            return None;
        }
        // Last member starting at or before the match
        let pos = self.members.partition_point(|member| member.start <= m.offset);
        let member = self.members.get(pos.checked_sub(1)?)?;
        (m.end() <= member.end()).then_some(member)
    }
}

fn rebase(m: ServiceMatch, base: usize) -> Issue {
    let start = m.offset - base;
    let mut issue =
        Issue::grammar(start, start + m.length, m.message).with_suggestions(m.replacements);
    if !m.rule_id.is_empty() {
        issue = issue.with_rule(m.rule_id, m.category);
    }
    issue
}

/// Group units into batches
///
/// `units` yields (caller index, unit) pairs in document order. Only
/// neighbours on the same sheet share a batch; a unit too long for any batch
/// is sent on its own.
pub fn plan<'a>(
    units: impl IntoIterator<Item = (usize, &'a TextUnit)>,
    limits: BatchLimits,
) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();

    for (index, unit) in units {
        let unit_len = unit.char_len();
        match batches.last_mut() {
            Some(batch) if batch.accepts(unit, unit_len, &limits) => {
                batch.push(index, unit, unit_len)
            }
            _ => batches.push(Batch::single(index, unit)),
        }
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn units(texts: &[(&str, &str)]) -> Vec<TextUnit> {
        texts
            .iter()
            .enumerate()
            .map(|(i, (sheet, text))| TextUnit::new(*sheet, i as u32, 0, *text))
            .collect()
    }

    fn plan_all(units: &[TextUnit], limits: BatchLimits) -> Vec<Batch> {
        plan(units.iter().enumerate(), limits)
    }

    #[test]
    fn test_joins_with_separator() {
        let units = units(&[("S", "He go home."), ("S", "This is fine.")]);
        let batches = plan_all(&units, BatchLimits::default());

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].text, "He go home.\n\nThis is fine.");
        assert_eq!(
            batches[0].members,
            vec![
                Member { index: 0, start: 0, len: 11 },
                Member { index: 1, start: 13, len: 13 },
            ]
        );
        assert_eq!(batches[0].char_len(), 26);
    }

    #[test]
    fn test_splits_on_sheet_change() {
        let units = units(&[("A", "one two three"), ("B", "four five six")]);
        let batches = plan_all(&units, BatchLimits::default());
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].sheet(), "B");
    }

    #[test]
    fn test_respects_limits() {
        let units = units(&[("S", "aaaa"), ("S", "bbbb"), ("S", "cccc"), ("S", "dddd")]);

        // 4 + 2 + 4 = 10 fits, a third unit would need 16
        let by_chars = plan_all(&units, BatchLimits { max_chars: 12, max_units: 20 });
        assert_eq!(by_chars.len(), 2);

        let by_units = plan_all(&units, BatchLimits { max_chars: 1500, max_units: 3 });
        assert_eq!(by_units.iter().map(|b| b.members.len()).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_oversized_unit_alone() {
        let long = "word ".repeat(40);
        let units = units(&[("S", "short one"), ("S", long.as_str()), ("S", "short two")]);
        let batches = plan_all(&units, BatchLimits { max_chars: 50, max_units: 20 });

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1].members.len(), 1);
        assert_eq!(batches[1].text, long);
    }

    #[test]
    fn test_remap_rebases_to_unit() {
        let units = units(&[("S", "He go home."), ("S", "She go out.")]);
        let batch = &plan_all(&units, BatchLimits::default())[0];

        let issues = batch.remap(vec![
            ServiceMatch::new(3, 2, "agreement")
                .with_rule("HE_VERB_AGR", "GRAMMAR")
                .with_replacements(["goes"]),
            ServiceMatch::new(17, 2, "agreement"),
        ]);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].0, 0);
        assert_eq!((issues[0].1.start, issues[0].1.end), (3, 5));
        assert_eq!(issues[0].1.suggestions, vec!["goes"]);
        assert_eq!(issues[0].1.rule.as_ref().unwrap().id, "HE_VERB_AGR");
        assert_eq!(issues[1].0, 1);
        assert_eq!((issues[1].1.start, issues[1].1.end), (4, 6));
        assert!(issues[1].1.rule.is_none());
    }

    #[test]
    fn test_remap_drops_straddling_and_separator_matches() {
        let units = units(&[("S", "abc"), ("S", "def")]);
        let batch = &plan_all(&units, BatchLimits::default())[0];

        let issues = batch.remap(vec![
            // "c\n\nd" crosses the boundary
            ServiceMatch::new(2, 4, "straddles"),
            // the separator itself
            ServiceMatch::new(3, 2, "separator"),
            // empty match
            ServiceMatch::new(1, 0, "empty"),
            // past the end
            ServiceMatch::new(7, 3, "overflow"),
        ]);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_remap_counts_characters() {
        let units = units(&[("S", "café crème"), ("S", "naïve idea")]);
        let batch = &plan_all(&units, BatchLimits::default())[0];
        let issues = batch.remap(vec![ServiceMatch::new(12, 5, "x")]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, 1);
        assert_eq!(units[1].char_slice(issues[0].1.start, issues[0].1.end), Some("naïve"));
    }

    proptest! {
        #[test]
        fn prop_remapped_issues_fit_their_unit(
            texts in proptest::collection::vec("\\PC{0,30}", 1..8),
            raw in proptest::collection::vec((0usize..300, 0usize..40), 0..20),
            max_chars in 10usize..200,
        ) {
            let units: Vec<TextUnit> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| TextUnit::new("S", i as u32, 0, t.as_str()))
                .collect();
            let limits = BatchLimits { max_chars, max_units: 4 };

            for batch in plan_all(&units, limits) {
                let matches = raw
                    .iter()
                    .map(|&(offset, length)| ServiceMatch::new(offset, length, "m"))
                    .collect();
                for (index, issue) in batch.remap(matches) {
                    prop_assert!(issue.fits(units[index].char_len()));
                }
            }
        }

        #[test]
        fn prop_every_unit_batched_once_in_order(
            texts in proptest::collection::vec("[a-z ]{0,40}", 0..30),
        ) {
            let units: Vec<TextUnit> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| TextUnit::new(if i % 7 < 4 { "A" } else { "B" }, i as u32, 0, t.as_str()))
                .collect();
            let order: Vec<usize> = plan_all(&units, BatchLimits { max_chars: 100, max_units: 5 })
                .iter()
                .flat_map(|b| b.members.iter().map(|m| m.index))
                .collect();
            prop_assert_eq!(order, (0..units.len()).collect::<Vec<_>>());
        }
    }
}
