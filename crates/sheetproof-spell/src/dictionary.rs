//! Word dictionaries
//!
//! A [`Dictionary`] is a set of lowercase words, each with a frequency rank
//! (its position in the word list, lower is more common). Lookup accepts
//! regular English inflections of known words, so the word lists only need
//! base forms.

use std::path::Path;

use ahash::AHashMap;

use crate::distance::distance_chars;
use crate::error::{SpellError, SpellResult};

/// Largest edit distance a suggestion may have
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Shortest stem an inflection may be stripped down to
const MIN_STEM_LEN: usize = 3;

#[derive(Debug, Clone)]
struct Entry {
    word: String,
    chars: Vec<char>,
}

/// A set of known words with frequency ranks
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<Entry>,
    ranks: AHashMap<String, u32>,
    /// Entry indices grouped by word length in characters
    by_len: AHashMap<usize, Vec<u32>>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from a word list, most frequent word first
    ///
    /// One word per line; blank lines and lines starting with `#` are ignored.
    pub fn from_word_list(list: &str) -> Self {
        let mut dict = Self::new();
        dict.extend_from_word_list(list);
        dict
    }

    /// Load a dictionary from a word-list file
    pub fn load_file(path: impl AsRef<Path>) -> SpellResult<Self> {
        let mut dict = Self::new();
        dict.extend_from_file(path)?;
        Ok(dict)
    }

    /// Add every word of a word list, returning how many were new
    pub fn extend_from_word_list(&mut self, list: &str) -> usize {
        list.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|word| self.add_word(word))
            .count()
    }

    /// Add every word of a word-list file, returning how many were new
    pub fn extend_from_file(&mut self, path: impl AsRef<Path>) -> SpellResult<usize> {
        let path = path.as_ref();
        let list = std::fs::read_to_string(path).map_err(|source| SpellError::DictionaryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let added = self.extend_from_word_list(&list);
        log::debug!("Loaded {} new words from {}", added, path.display());
        Ok(added)
    }

    /// Add a single word; returns false if it was already known
    pub fn add_word(&mut self, word: &str) -> bool {
        let word = normalize(word);
        if word.is_empty() || self.ranks.contains_key(&word) {
            return false;
        }

        let index = self.entries.len() as u32;
        let chars: Vec<char> = word.chars().collect();
        self.by_len.entry(chars.len()).or_default().push(index);
        self.ranks.insert(word.clone(), index);
        self.entries.push(Entry { word, chars });
        true
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary has no words
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frequency rank of an exact (case-insensitive) entry
    pub fn rank(&self, word: &str) -> Option<u32> {
        self.ranks.get(&normalize(word)).copied()
    }

    /// Check whether a word is spelled correctly
    ///
    /// Case-insensitive. Accepts a possessive `'s` and the regular
    /// inflections (plural, past tense, gerund, adverb, comparative) of
    /// known words.
    pub fn contains(&self, word: &str) -> bool {
        let word = normalize(word);
        if self.ranks.contains_key(&word) {
            return true;
        }
        if let Some(stem) = word.strip_suffix("'s") {
            return self.ranks.contains_key(stem) || self.knows_inflection(stem);
        }
        self.knows_inflection(&word)
    }

    /// Nearest known words, best first
    ///
    /// Candidates are at most [`MAX_SUGGESTION_DISTANCE`] edits away, ranked
    /// by distance, then frequency rank, then alphabetically. Returned in
    /// lowercase.
    pub fn suggest(&self, word: &str, max: usize) -> Vec<String> {
        if max == 0 {
            return Vec::new();
        }

        let word = normalize(word);
        let chars: Vec<char> = word.chars().collect();
        let min_len = chars.len().saturating_sub(MAX_SUGGESTION_DISTANCE);
        let max_len = chars.len() + MAX_SUGGESTION_DISTANCE;

        let mut candidates: Vec<(usize, u32, &str)> = Vec::new();
        for len in min_len..=max_len {
            let Some(indices) = self.by_len.get(&len) else {
                continue;
            };
            for &index in indices {
                let entry = &self.entries[index as usize];
                if let Some(distance) =
                    distance_chars(&chars, &entry.chars, MAX_SUGGESTION_DISTANCE)
                {
                    if distance > 0 {
                        candidates.push((distance, index, entry.word.as_str()));
                    }
                }
            }
        }

        candidates.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(b.2)));
        candidates
            .into_iter()
            .take(max)
            .map(|(_, _, word)| word.to_string())
            .collect()
    }

    fn knows(&self, stem: &str) -> bool {
        stem.chars().count() >= MIN_STEM_LEN && self.ranks.contains_key(stem)
    }

    /// Regular suffixes: -s, -es, -ies, -ed, -ied, -ing, -ly, -ily, -er, -est
    fn knows_inflection(&self, word: &str) -> bool {
        if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
            if self.knows(&format!("{stem}y")) {
                return true;
            }
        }
        if let Some(stem) = word.strip_suffix("ily").or_else(|| word.strip_suffix("ier")) {
            if self.knows(&format!("{stem}y")) {
                return true;
            }
        }
        if let Some(stem) = word.strip_suffix("iest") {
            if self.knows(&format!("{stem}y")) {
                return true;
            }
        }
        if let Some(stem) = word.strip_suffix("es") {
            if self.knows(stem) {
                return true;
            }
        }
        if let Some(stem) = word.strip_suffix('s') {
            if !stem.ends_with('s') && self.knows(stem) {
                return true;
            }
        }
        if let Some(stem) = word.strip_suffix("ly") {
            if self.knows(stem) {
                return true;
            }
        }
        for suffix in ["ed", "ing", "er", "est"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if self.knows(stem)
                    || self.knows(&format!("{stem}e"))
                    || undoubled(stem).is_some_and(|s| self.knows(s))
                {
                    return true;
                }
            }
        }
        false
    }
}

/// "planned" -> "plan": drop a doubled final consonant
fn undoubled(stem: &str) -> Option<&str> {
    let mut rev = stem.chars().rev();
    let last = rev.next()?;
    let before = rev.next()?;
    if last == before && !matches!(last, 'a' | 'e' | 'i' | 'o' | 'u') {
        Some(&stem[..stem.len() - last.len_utf8()])
    } else {
        None
    }
}

/// Lowercase, with typographic apostrophes folded to ASCII
fn normalize(word: &str) -> String {
    word.trim().to_lowercase().replace('’', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Dictionary {
        Dictionary::from_word_list(
            "# sample\nthe\nthis\nthus\nreceive\nrelieve\nplan\nfile\ncompany\nquick\nbox\nhappy\n\nisn't\n",
        )
    }

    #[test]
    fn test_word_list_parsing() {
        let dict = sample();
        assert_eq!(dict.len(), 12);
        assert_eq!(dict.rank("the"), Some(0));
        assert_eq!(dict.rank("THIS"), Some(1));
        assert_eq!(dict.rank("# sample"), None);
    }

    #[test]
    fn test_add_word_deduplicates() {
        let mut dict = sample();
        assert!(!dict.add_word("The"));
        assert!(dict.add_word("Sheetproof"));
        assert!(dict.contains("sheetproof"));
    }

    #[test]
    fn test_case_insensitive() {
        let dict = sample();
        assert!(dict.contains("Receive"));
        assert!(dict.contains("RECEIVE"));
    }

    #[test]
    fn test_apostrophes() {
        let dict = sample();
        assert!(dict.contains("isn't"));
        assert!(dict.contains("isn’t"));
        assert!(dict.contains("company's"));
        assert!(dict.contains("Company’s"));
        assert!(!dict.contains("compny's"));
    }

    #[test]
    fn test_inflections() {
        let dict = sample();
        for word in [
            "plans", "planned", "planning", "filed", "filing", "companies", "boxes", "quickly",
            "quicker", "quickest", "happily", "happier", "receives", "received",
        ] {
            assert!(dict.contains(word), "{word} should be accepted");
        }
        for word in ["recieves", "recieved", "thess"] {
            assert!(!dict.contains(word), "{word} should be rejected");
        }
    }

    #[test]
    fn test_suggestion_ranking() {
        let dict = sample();
        // receive and relieve are both one edit away; receive ranks higher
        assert_eq!(dict.suggest("recieve", 5), vec!["receive", "relieve"]);
        assert_eq!(dict.suggest("thsi", 2), vec!["this", "the"]);
        assert_eq!(dict.suggest("thsi", 1), vec!["this"]);
        assert!(dict.suggest("zzzzzzzz", 5).is_empty());
        assert!(dict.suggest("thsi", 0).is_empty());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"# custom\nSheetproof\nLanguageTool\n").unwrap();

        let dict = Dictionary::load_file(file.path()).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("languagetool"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dictionary::load_file("/nonexistent/words.txt").unwrap_err();
        assert!(matches!(err, SpellError::DictionaryLoad { .. }));
    }
}
