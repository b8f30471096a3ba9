//! Cell notes
//!
//! Findings travel with the document as notes: each flagged cell gets one
//! listing what was found. A note the user wrote is kept alongside.
//!
//! ```rust
//! use sheetproof_core::{CellComment, Worksheet};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_comment("A1", CellComment::new("reviewer", "Check this total")).unwrap();
//! assert_eq!(sheet.comment("A1").unwrap().unwrap().author, "reviewer");
//! ```

use std::fmt;

/// A note attached to one cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellComment {
    /// Who wrote it; may be empty for notes from older files
    pub author: String,
    pub text: String,
    /// Shown permanently rather than on hover
    pub visible: bool,
}

impl CellComment {
    /// A hidden note
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            visible: false,
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl fmt::Display for CellComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.author.as_str() {
            "" => f.write_str(&self.text),
            author => write!(f, "{author}: {}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_hidden() {
        let comment = CellComment::new("alice", "Ask finance");
        assert!(!comment.visible);
        assert!(comment.with_visible(true).visible);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellComment::new("alice", "Ask finance").to_string(), "alice: Ask finance");
        assert_eq!(CellComment::new("", "Ask finance").to_string(), "Ask finance");
    }
}
