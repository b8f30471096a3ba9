//! The spelling checker

use ahash::{AHashMap, AHashSet};
use sheetproof_core::{Issue, Language, TextUnit};

use crate::builtin::builtin;
use crate::dictionary::Dictionary;
use crate::error::{SpellError, SpellResult};
use crate::tokenize::{tokenize, Token};

/// Spelling checker options
#[derive(Debug, Clone)]
pub struct SpellConfig {
    /// Tokens shorter than this many characters are not checked
    pub min_word_len: usize,
    /// Maximum number of suggestions per issue
    pub max_suggestions: usize,
    /// Words never flagged (case-insensitive)
    pub ignore: Vec<String>,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            min_word_len: 2,
            max_suggestions: 5,
            ignore: Vec::new(),
        }
    }
}

impl SpellConfig {
    /// Add a word to the ignore list
    pub fn ignore_word(mut self, word: impl Into<String>) -> Self {
        self.ignore.push(word.into());
        self
    }
}

/// Dictionary-based spelling checker
///
/// Holds one dictionary per [`Language`]. Checking is read-only, so a single
/// checker can be shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SpellChecker {
    config: SpellConfig,
    ignore: AHashSet<String>,
    dictionaries: AHashMap<Language, Dictionary>,
}

impl SpellChecker {
    /// Create a checker with the built-in dictionaries for every language
    pub fn new(config: SpellConfig) -> Self {
        Self::with_dictionaries(
            config,
            Language::ALL.into_iter().map(|lang| (lang, builtin(lang))),
        )
    }

    /// Create a checker with caller-supplied dictionaries only
    pub fn with_dictionaries(
        config: SpellConfig,
        dictionaries: impl IntoIterator<Item = (Language, Dictionary)>,
    ) -> Self {
        let ignore = config
            .ignore
            .iter()
            .map(|w| w.trim().to_lowercase().replace('’', "'"))
            .collect();
        Self {
            config,
            ignore,
            dictionaries: dictionaries.into_iter().collect(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &SpellConfig {
        &self.config
    }

    /// The dictionary used for a language
    pub fn dictionary(&self, language: Language) -> Option<&Dictionary> {
        self.dictionaries.get(&language)
    }

    /// Add extra words for a language from a word-list file
    ///
    /// Returns the number of words that were not already known.
    pub fn add_words_from_file(
        &mut self,
        language: Language,
        path: impl AsRef<std::path::Path>,
    ) -> SpellResult<usize> {
        self.dictionaries
            .entry(language)
            .or_default()
            .extend_from_file(path)
    }

    /// Add a single extra word for a language
    pub fn add_word(&mut self, language: Language, word: &str) -> bool {
        self.dictionaries.entry(language).or_default().add_word(word)
    }

    /// Check a piece of text, returning one issue per unknown word
    pub fn check(&self, text: &str, language: Language) -> SpellResult<Vec<Issue>> {
        let dict = self
            .dictionaries
            .get(&language)
            .ok_or(SpellError::MissingDictionary(language))?;

        let issues = tokenize(text)
            .into_iter()
            .filter(|token| self.should_check(token))
            .filter(|token| !dict.contains(token.text))
            .map(|token| {
                let suggestions = dict
                    .suggest(token.text, self.config.max_suggestions)
                    .into_iter()
                    .map(|s| match_case(token.text, &s))
                    .collect();
                Issue::spelling(token.start, token.end, suggestions)
            })
            .collect::<Vec<_>>();

        if !issues.is_empty() {
            log::trace!("{} unknown words in {:?}", issues.len(), text);
        }
        Ok(issues)
    }

    /// Check text against a language given by its locale code
    pub fn check_code(&self, text: &str, code: &str) -> SpellResult<Vec<Issue>> {
        let language: Language = code
            .parse()
            .map_err(|_| SpellError::UnsupportedLanguage(code.to_string()))?;
        self.check(text, language)
    }

    /// Check one extracted cell
    pub fn check_unit(&self, unit: &TextUnit, language: Language) -> SpellResult<Vec<Issue>> {
        self.check(&unit.text, language)
    }

    fn should_check(&self, token: &Token<'_>) -> bool {
        if token.char_len() < self.config.min_word_len || token.is_all_uppercase() {
            return false;
        }
        if self.ignore.is_empty() {
            return true;
        }
        !self
            .ignore
            .contains(&token.text.to_lowercase().replace('’', "'"))
    }
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self::new(SpellConfig::default())
    }
}

/// Give a lowercase suggestion the casing of the word it replaces
fn match_case(original: &str, suggestion: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic());
    let Some(first) = letters.next() else {
        return suggestion.to_string();
    };

    let rest_upper = original
        .chars()
        .filter(|c| c.is_alphabetic())
        .skip(1)
        .all(char::is_uppercase);

    if first.is_uppercase() && rest_upper && original.chars().count() > 1 {
        suggestion.to_uppercase()
    } else if first.is_uppercase() {
        let mut chars = suggestion.chars();
        match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        suggestion.to_string()
    }
}
