//! CSV loader for business expenses.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive.
//!
//! | Column          | Required | Type    | Notes                                        |
//! |-----------------|----------|---------|----------------------------------------------|
//! | `description`   | yes      | string  | Must not be empty                            |
//! | `amount`        | yes      | decimal | Must be positive, e.g. `120.50`              |
//! | `also_employee` | no       | boolean | `true`/`false`, `yes`/`no`, `1`/`0`; empty is `false` |
//!
//! `also_employee` marks costs a salaried employee would pay out of pocket
//! as well; they become the employee's personal non-deductible expenses.
//!
//! ### Example
//!
//! ```csv
//! description,amount,also_employee
//! AWS Hosting,200.00,false
//! Internet casa,360.00,true
//! Comida cliente,150.00,
//! ```
use std::path::Path;

use fiscal_core::expenses::{Expense, ExpenseLedger, LedgerError};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    description: String,
    amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_flag")]
    also_employee: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") | Some("no") | Some("0") => Ok(false),
        Some("true") | Some("yes") | Some("1") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid also_employee value '{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading expenses from CSV.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseCsvError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but the ledger refused it. `row` is 1-based
    /// (header = row 0).
    #[error("invalid expense on row {row}: {source}")]
    InvalidExpense {
        row: usize,
        #[source]
        source: LedgerError,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parse CSV text and return the expenses as a ledger, in file order.
///
/// # Errors
///
/// * [ExpenseCsvError::Parse] – if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [ExpenseCsvError::InvalidExpense] – if a row has an empty description
///   or a non-positive amount.
pub fn load_from_str(input: &str) -> Result<ExpenseLedger, ExpenseCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let mut ledger = ExpenseLedger::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let expense = Expense {
            description: row.description,
            amount: row.amount,
            also_employee: row.also_employee,
        };
        ledger
            .add(expense)
            .map_err(|source| ExpenseCsvError::InvalidExpense {
                row: idx + 1,
                source,
            })?;
    }

    Ok(ledger)
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<ExpenseLedger, ExpenseCsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExpenseCsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MINIMAL_CSV: &str = "\
description,amount
AWS Hosting,200.00
";

    const FLAGGED_CSV: &str = "\
description,amount,also_employee
AWS Hosting,200.00,false
Internet casa,360.00,true
Comida cliente,150.00,
Móvil,240,yes
";

    #[test]
    fn test_minimal_csv_parses_required_fields() {
        let ledger = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.as_slice()[0],
            Expense::new("AWS Hosting", dec!(200.00))
        );
    }

    #[test]
    fn test_flags_feed_personal_total() {
        let ledger = load_from_str(FLAGGED_CSV).expect("should parse flagged CSV");

        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.total_amount(), dec!(950.00));
        assert_eq!(ledger.personal_total(), dec!(600.00));
    }

    #[test]
    fn test_rows_keep_file_order() {
        let ledger = load_from_str(FLAGGED_CSV).expect("should parse");

        let descriptions: Vec<_> = ledger.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["AWS Hosting", "Internet casa", "Comida cliente", "Móvil"]
        );
    }

    #[test]
    fn test_invalid_flag_returns_parse_error() {
        let csv = "description,amount,also_employee\nHosting,10,maybe\n";

        match load_from_str(csv).unwrap_err() {
            ExpenseCsvError::Parse(_) => {}
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_amount_reports_row() {
        let csv = "\
description,amount
Hosting,10.00
Reembolso,-5.00
";

        match load_from_str(csv).unwrap_err() {
            ExpenseCsvError::InvalidExpense { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(
                    source,
                    LedgerError::NonPositiveAmount {
                        description: "Reembolso".to_string(),
                        amount: dec!(-5.00),
                    }
                );
            }
            other => panic!("expected InvalidExpense, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_description_reports_row() {
        let csv = "description,amount\n,10.00\n";

        match load_from_str(csv).unwrap_err() {
            ExpenseCsvError::InvalidExpense { row, source } => {
                assert_eq!(row, 1);
                assert_eq!(source, LedgerError::EmptyDescription);
            }
            other => panic!("expected InvalidExpense, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "description\nHosting\n";

        match load_from_str(csv).unwrap_err() {
            ExpenseCsvError::Parse(_) => {}
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_amount_returns_parse_error() {
        let csv = "description,amount\nHosting,doscientos\n";

        assert!(matches!(
            load_from_str(csv).unwrap_err(),
            ExpenseCsvError::Parse(_)
        ));
    }

    #[test]
    fn test_header_only_is_empty_ledger() {
        let ledger = load_from_str("description,amount\n").expect("header-only CSV is valid");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_whitespace_and_column_order() {
        let csv = "\
 amount , description
 99.90 , Licencia software
";
        let ledger = load_from_str(csv).expect("should tolerate whitespace and reordering");

        assert_eq!(ledger.as_slice()[0].description, "Licencia software");
        assert_eq!(ledger.as_slice()[0].amount, dec!(99.90));
        assert!(!ledger.as_slice()[0].also_employee);
    }
}
