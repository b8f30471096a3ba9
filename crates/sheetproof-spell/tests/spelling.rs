//! Spelling checker tests against the built-in dictionaries

use std::io::Write;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheetproof_core::{IssueKind, Language, TextUnit};
use sheetproof_spell::{SpellChecker, SpellConfig, SpellError};

#[test]
fn test_thsi_is_bad() {
    let checker = SpellChecker::default();
    let issues = checker.check("Thsi is bad", Language::EnUs).unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Spelling);
    assert_eq!((issues[0].start, issues[0].end), (0, 4));
    assert_eq!(issues[0].suggestions[0], "This");
}

#[test]
fn test_ordinary_prose_is_clean() {
    let checker = SpellChecker::default();
    let prose = [
        "The committee approved the budget amendment yesterday.",
        "Annual revenue forecast exceeds expectations.",
        "Please contact the supplier about the overdue payment.",
        "The warehouse manager reconciled the stock ledger before the auditors arrived on Thursday morning.",
        "Accounts receivable shows three customers with balances overdue by more than ninety days.",
        "Shareholders approved the merger despite concerns about layoffs, severance packages and the pending lawsuit.",
        "Heavy snowfall delayed the shipment, so the retailer offered customers a discount voucher and free shipping.",
        "The plumber replaced the leaking faucet, unclogged the drain and fixed the noisy radiator in the hallway.",
        "Please double-check the formulas in the summary tab before sharing the workbook with the auditors.",
        "Write-offs of uncollectible debts are approved by the finance director and recorded in the bad debt provision.",
    ];

    for lang in Language::ALL {
        for sentence in prose {
            let issues = checker.check(sentence, lang).unwrap();
            assert!(issues.is_empty(), "{lang}: {sentence:?} flagged {issues:?}");
        }
    }
}

#[test]
fn test_check_unit() {
    let checker = SpellChecker::default();
    let unit = TextUnit::new("Invoices", 3, 1, "Total amount recieved");
    let issues = checker.check_unit(&unit, Language::EnGb).unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(unit.char_slice(issues[0].start, issues[0].end), Some("recieved"));
    assert_eq!(issues[0].suggestions[0], "received");
}

#[test]
fn test_custom_word_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# product names").unwrap();
    writeln!(file, "Sheetproof").unwrap();
    writeln!(file, "Contoso").unwrap();

    let mut checker = SpellChecker::new(SpellConfig::default());
    let added = checker.add_words_from_file(Language::EnUs, file.path()).unwrap();
    assert_eq!(added, 2);

    assert!(checker
        .check("Contoso uses Sheetproof", Language::EnUs)
        .unwrap()
        .is_empty());
    // Only the language the list was loaded for learns the words
    assert_eq!(
        checker.check("Contoso", Language::EnGb).unwrap().len(),
        1
    );
}

#[test]
fn test_missing_word_file() {
    let mut checker = SpellChecker::default();
    let err = checker
        .add_words_from_file(Language::EnUs, "/nonexistent/words.txt")
        .unwrap_err();
    assert!(matches!(err, SpellError::DictionaryLoad { .. }));
    assert!(err.to_string().contains("/nonexistent/words.txt"));
}

proptest! {
    #[test]
    fn prop_issues_within_text(text in "\\PC{0,80}") {
        let checker = SpellChecker::default();
        let len = text.chars().count();
        for issue in checker.check(&text, Language::EnUs).unwrap() {
            prop_assert!(issue.fits(len));
            prop_assert!(issue.suggestions.len() <= 5);
        }
    }
}
