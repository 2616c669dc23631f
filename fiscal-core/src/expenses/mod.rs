//! Business expenses: the session ledger and the classification seam that
//! turns them into a deductible total and a fiscal risk score.

pub mod classifier;
pub mod ledger;

pub use classifier::{
    ClassifiedExpense, ClassifiedExpenses, ClassifierError, Expense, ExpenseCategory,
    ExpenseClassifier, KeywordClassifier, KeywordRules, risk_score,
};
pub use ledger::{ExpenseLedger, LedgerError};
