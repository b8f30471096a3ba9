//! Spelling checker errors

use std::path::PathBuf;

use sheetproof_core::Language;
use thiserror::Error;

/// Result type for spelling operations
pub type SpellResult<T> = std::result::Result<T, SpellError>;

/// Errors raised by the spelling checker
///
/// All of them are configuration errors: checking itself cannot fail.
#[derive(Debug, Error)]
pub enum SpellError {
    /// The language code is not one of the supported locales
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// No dictionary is loaded for the requested language
    #[error("No dictionary loaded for language {0}")]
    MissingDictionary(Language),

    /// A word-list file could not be read
    #[error("Failed to load word list {path}: {source}")]
    DictionaryLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
