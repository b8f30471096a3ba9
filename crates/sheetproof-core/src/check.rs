//! Vocabulary shared by the checking stages
//!
//! - [`Language`] - the locale a document is checked against
//! - [`TextUnit`] - one cell's text, as handed to the checkers
//! - [`Issue`] - one finding inside a unit's text
//!
//! All offsets are counted in characters (Unicode scalar values), never bytes.

use std::fmt;
use std::str::FromStr;

use crate::cell::CellAddress;
use crate::error::Error;

/// Supported checking languages
///
/// The set is closed: anything else is a configuration error, raised before
/// any cell is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Language {
    /// American English
    #[cfg_attr(feature = "serde", serde(rename = "en-US"))]
    EnUs,
    /// British English
    #[cfg_attr(feature = "serde", serde(rename = "en-GB"))]
    EnGb,
}

impl Language {
    /// Every supported language, in display order
    pub const ALL: [Language; 2] = [Language::EnUs, Language::EnGb];

    /// The locale code (e.g. "en-US") sent to the grammar service
    pub fn code(&self) -> &'static str {
        match self {
            Language::EnUs => "en-US",
            Language::EnGb => "en-GB",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::EnUs => "English (US)",
            Language::EnGb => "English (UK)",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Parse a locale code; case-insensitive, `_` is accepted for `-`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" => Ok(Language::EnUs),
            "en-gb" => Ok(Language::EnGb),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// One cell's text content, the unit of work for both checkers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextUnit {
    /// Name of the sheet the cell lives on
    pub sheet: String,
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based)
    pub col: u16,
    /// The cell's text, exactly as stored
    pub text: String,
}

impl TextUnit {
    /// Create a new text unit
    pub fn new(sheet: impl Into<String>, row: u32, col: u16, text: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            col,
            text: text.into(),
        }
    }

    /// The cell's address
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// The text between two character offsets, if they are in range
    pub fn char_slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let mut indices = self
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()));
        let from = indices.nth(start)?;
        let to = if end == start {
            from
        } else {
            indices.nth(end - start - 1)?
        };
        Some(&self.text[from..to])
    }
}

/// Which checker produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IssueKind {
    /// Unknown word
    Spelling,
    /// Grammar rule match
    Grammar,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueKind::Spelling => "spelling",
            IssueKind::Grammar => "grammar",
        })
    }
}

/// The grammar rule that produced an issue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleRef {
    /// Rule identifier (e.g. "EN_A_VS_AN")
    pub id: String,
    /// Rule category (e.g. "GRAMMAR", "TYPOS")
    pub category: String,
}

/// A single finding inside a text unit
///
/// Invariant once reconciled: `start < end <= chars(text)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    /// Which checker produced this issue
    pub kind: IssueKind,
    /// First character covered (inclusive)
    pub start: usize,
    /// One past the last character covered
    pub end: usize,
    /// Short human-readable description
    pub message: String,
    /// Replacement candidates, best first
    pub suggestions: Vec<String>,
    /// Grammar rule, when the service reported one
    pub rule: Option<RuleRef>,
}

impl Issue {
    /// Create a spelling issue
    pub fn spelling(start: usize, end: usize, suggestions: Vec<String>) -> Self {
        Self {
            kind: IssueKind::Spelling,
            start,
            end,
            message: "possible misspelling".to_string(),
            suggestions,
            rule: None,
        }
    }

    /// Create a grammar issue
    pub fn grammar(start: usize, end: usize, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Grammar,
            start,
            end,
            message: message.into(),
            suggestions: Vec::new(),
            rule: None,
        }
    }

    /// Attach suggestions
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Attach the rule that produced this issue
    pub fn with_rule(mut self, id: impl Into<String>, category: impl Into<String>) -> Self {
        self.rule = Some(RuleRef {
            id: id.into(),
            category: category.into(),
        });
        self
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the issue covers no characters
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other`'s range lies entirely within this issue's range
    pub fn contains(&self, other: &Issue) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if the offsets are valid for a text of `char_len` characters
    pub fn fits(&self, char_len: usize) -> bool {
        self.start < self.end && self.end <= char_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("en-US".parse::<Language>().unwrap(), Language::EnUs);
        assert_eq!("en_gb".parse::<Language>().unwrap(), Language::EnGb);
        assert_eq!(" EN-us ".parse::<Language>().unwrap(), Language::EnUs);
        assert!(matches!(
            "fr-FR".parse::<Language>(),
            Err(Error::UnsupportedLanguage(code)) if code == "fr-FR"
        ));
    }

    #[test]
    fn test_language_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_char_slice_counts_characters() {
        let unit = TextUnit::new("S", 0, 0, "café crème");
        assert_eq!(unit.char_len(), 10);
        assert_eq!(unit.char_slice(0, 4), Some("café"));
        assert_eq!(unit.char_slice(5, 10), Some("crème"));
        assert_eq!(unit.char_slice(3, 3), Some(""));
        assert_eq!(unit.char_slice(5, 11), None);
        assert_eq!(unit.char_slice(4, 2), None);
    }

    #[test]
    fn test_issue_containment() {
        let grammar = Issue::grammar(0, 11, "clause");
        assert!(grammar.contains(&Issue::spelling(0, 4, vec![])));
        assert!(!grammar.contains(&Issue::spelling(8, 12, vec![])));
    }

    #[test]
    fn test_issue_fits() {
        assert!(Issue::spelling(0, 4, vec![]).fits(4));
        assert!(!Issue::spelling(0, 5, vec![]).fits(4));
        assert!(!Issue::spelling(2, 2, vec![]).fits(4));
    }
}
