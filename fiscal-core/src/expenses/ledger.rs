//! Session expense list built up before a simulation.

use rust_decimal::Decimal;
use thiserror::Error;

use super::classifier::Expense;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("expense description must not be empty")]
    EmptyDescription,

    #[error("expense '{description}' must have a positive amount, got {amount}")]
    NonPositiveAmount { description: String, amount: Decimal },
}

/// Ordered list of expenses, in the order they were entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseLedger {
    expenses: Vec<Expense>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an expense after checking it carries a description and a
    /// positive amount.
    pub fn add(
        &mut self,
        expense: Expense,
    ) -> Result<(), LedgerError> {
        if expense.description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if expense.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                description: expense.description,
                amount: expense.amount,
            });
        }
        self.expenses.push(expense);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.expenses.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.expenses.iter()
    }

    pub fn as_slice(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn total_amount(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    /// Sum of the expenses an employee would also pay privately.
    pub fn personal_total(&self) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| e.also_employee)
            .map(|e| e.amount)
            .sum()
    }
}

impl<'a> IntoIterator for &'a ExpenseLedger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
