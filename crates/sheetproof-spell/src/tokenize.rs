//! Word tokenization with character offsets

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters, optionally joined by inner apostrophes ("don't", "O’Brien").
/// Digits, punctuation and whitespace all separate words.
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+(?:['’]\p{L}+)*").expect("word pattern is valid"));

/// A word found in a cell's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The word as written
    pub text: &'a str,
    /// Character offset of the first letter
    pub start: usize,
    /// Character offset one past the last letter
    pub end: usize,
}

impl Token<'_> {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    /// True for acronyms: two or more letters, all of them uppercase
    pub fn is_all_uppercase(&self) -> bool {
        let mut letters = 0;
        for c in self.text.chars().filter(|c| c.is_alphabetic()) {
            if !c.is_uppercase() {
                return false;
            }
            letters += 1;
        }
        letters >= 2
    }
}

/// Split text into word tokens, with offsets counted in characters
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    // Byte offsets from the regex are converted incrementally, so the whole
    // scan stays linear in the text length.
    let mut byte_pos = 0;
    let mut char_pos = 0;

    for m in WORD.find_iter(text) {
        char_pos += text[byte_pos..m.start()].chars().count();
        let len = m.as_str().chars().count();
        tokens.push(Token {
            text: m.as_str(),
            start: char_pos,
            end: char_pos + len,
        });
        char_pos += len;
        byte_pos = m.end();
    }

    tokens
}
