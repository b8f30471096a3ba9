//! Word lists compiled into the crate

use sheetproof_core::Language;

use crate::dictionary::Dictionary;

/// Shared English words, most frequent first
const EN_COMMON: &str = include_str!("../dictionaries/en_common.txt");
/// American spellings (color, organize, center)
const EN_US: &str = include_str!("../dictionaries/en_us.txt");
/// British spellings (colour, organise, centre)
const EN_GB: &str = include_str!("../dictionaries/en_gb.txt");

/// The built-in dictionary for a language
pub(crate) fn builtin(language: Language) -> Dictionary {
    let mut dict = Dictionary::from_word_list(EN_COMMON);
    let variants = match language {
        Language::EnUs => EN_US,
        Language::EnGb => EN_GB,
    };
    dict.extend_from_word_list(variants);
    log::debug!("Built-in dictionary for {}: {} words", language, dict.len());
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_variants() {
        let us = builtin(Language::EnUs);
        let gb = builtin(Language::EnGb);

        assert!(us.contains("color") && !us.contains("colour"));
        assert!(gb.contains("colour") && !gb.contains("color"));
        assert!(us.contains("organize") && !us.contains("organise"));
        assert!(gb.contains("analyse") && !gb.contains("analyze"));
    }

    #[test]
    fn test_common_words_shared() {
        for lang in Language::ALL {
            let dict = builtin(lang);
            for word in ["the", "invoice", "receive", "quarterly", "isn't"] {
                assert!(dict.contains(word), "{word} missing for {lang}");
            }
        }
    }

    #[test]
    fn test_everyday_vocabulary() {
        for lang in Language::ALL {
            let dict = builtin(lang);
            for word in [
                "amendment",
                "exceeds",
                "expectations",
                "overdue",
                "leasehold",
                "stairwell",
                "reimbursement",
                "café",
            ] {
                assert!(dict.contains(word), "{word} missing for {lang}");
            }
            assert!(dict.len() > 15_000, "{lang} has only {} words", dict.len());
        }
    }

    #[test]
    fn test_header_comment_skipped() {
        let dict = builtin(Language::EnUs);
        assert_eq!(dict.rank("the"), Some(0));
    }
}
