//! Integration tests that exercise the expense loader against an on-disk
//! fixture file and feed the result through the classifier.

use std::path::Path;

use fiscal_cli::csv_loader::{self, ExpenseCsvError};
use fiscal_core::expenses::{ExpenseCategory, ExpenseClassifier, KeywordClassifier};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_expenses.csv")
        .leak()
}

#[test]
fn test_load_fixture_file_succeeds() {
    let ledger =
        csv_loader::load_from_file(fixture_path()).expect("fixture file should load without error");

    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger.total_amount(), dec!(900.00));
    assert_eq!(ledger.personal_total(), dec!(100.00));
}

#[tokio::test]
async fn test_fixture_classification() {
    let ledger = csv_loader::load_from_file(fixture_path()).unwrap();

    let classified = KeywordClassifier::default()
        .classify(ledger.as_slice(), "6201")
        .await
        .expect("classification should succeed");

    let categories: Vec<_> = classified.expenses.iter().map(|e| e.category).collect();
    assert_eq!(
        categories,
        vec![
            ExpenseCategory::PartialDeduction,
            ExpenseCategory::Conflictive,
            ExpenseCategory::PartialDeduction,
            ExpenseCategory::PartialDeduction,
        ]
    );
    assert_eq!(classified.total_deductible, dec!(900.00));
    // (200 × 5 + 150 × 10 + 100 × 5 + 450 × 5) / 900 = 5.83
    assert_eq!(classified.risk_score, 5);
}

#[test]
fn test_load_nonexistent_file_returns_err() {
    let bad_path = Path::new("/this/path/does/not/exist.csv");

    let result = csv_loader::load_from_file(bad_path);

    assert!(matches!(result, Err(ExpenseCsvError::Io { .. })));
}
