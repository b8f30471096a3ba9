//! # sheetproof-spell
//!
//! Local, deterministic spelling checker for sheetproof.
//!
//! Text is split into word tokens, each token is looked up in the dictionary
//! for the run's [`Language`](sheetproof_core::Language), and unknown tokens
//! become spelling [`Issue`](sheetproof_core::Issue)s carrying edit-distance
//! suggestions.
//!
//! ## Example
//!
//! ```rust
//! use sheetproof_core::Language;
//! use sheetproof_spell::{SpellChecker, SpellConfig};
//!
//! let checker = SpellChecker::new(SpellConfig::default());
//! let issues = checker.check("Recieve the invoice", Language::EnUs).unwrap();
//!
//! assert_eq!(issues.len(), 1);
//! assert_eq!((issues[0].start, issues[0].end), (0, 7));
//! assert_eq!(issues[0].suggestions[0], "Receive");
//! ```

mod builtin;
mod checker;
mod dictionary;
mod distance;
mod error;
mod tokenize;

pub use checker::{SpellChecker, SpellConfig};
pub use dictionary::Dictionary;
pub use distance::osa_distance;
pub use error::{SpellError, SpellResult};
pub use tokenize::{tokenize, Token};
