pub mod calculations;
pub mod expenses;
pub mod models;
pub mod source;

#[cfg(test)]
mod fixtures;

pub use calculations::RegimeSimulator;
pub use expenses::{ClassifiedExpenses, Expense, ExpenseClassifier, ExpenseLedger, KeywordClassifier};
pub use models::*;
pub use source::{FallbackSource, ReferenceDataSource, SourceError};
