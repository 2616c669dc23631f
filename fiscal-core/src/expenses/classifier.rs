//! Expense classification.
//!
//! The simulator only consumes the deductible total, so any producer of
//! [`ClassifiedExpenses`] can stand behind [`ExpenseClassifier`]. The
//! bundled [`KeywordClassifier`] matches descriptions against three keyword
//! lists:
//!
//! | List         | Category           | Confidence | Risk weight |
//! |--------------|--------------------|------------|-------------|
//! | full         | `FullDeduction`    | 0.95       | 1           |
//! | partial      | `PartialDeduction` | 0.80       | 5           |
//! | conflictive  | `Conflictive`      | 0.60       | 10          |
//! | (no match)   | `PartialDeduction` | 0.50       | 5           |
//!
//! Lists are checked in that order and the first hit wins. Every expense is
//! deducted in full; the category only feeds the risk score.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lowest and highest values [`risk_score`] can return.
pub const MIN_RISK_SCORE: u8 = 1;
pub const MAX_RISK_SCORE: u8 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("expense {index} ('{description}') has a negative amount: {amount}")]
    NegativeAmount {
        index: usize,
        description: String,
        amount: Decimal,
    },

    #[error("classification service unavailable: {0}")]
    Unavailable(String),
}

/// A business expense entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    pub amount: Decimal,
    /// Also paid out of pocket when salaried, so it counts toward the
    /// employee's personal non-deductible expenses.
    #[serde(default)]
    pub also_employee: bool,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            also_employee: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    FullDeduction,
    PartialDeduction,
    Conflictive,
}

impl ExpenseCategory {
    pub fn risk_weight(self) -> Decimal {
        match self {
            Self::FullDeduction => dec!(1),
            Self::PartialDeduction => dec!(5),
            Self::Conflictive => dec!(10),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullDeduction => "full deduction",
            Self::PartialDeduction => "partial deduction",
            Self::Conflictive => "conflictive",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub reason: String,
    pub confidence: Decimal,
    pub deductible_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedExpenses {
    pub expenses: Vec<ClassifiedExpense>,
    pub risk_score: u8,
    pub total_deductible: Decimal,
}

impl ClassifiedExpenses {
    /// Builds the aggregate from per-expense results.
    pub fn from_expenses(expenses: Vec<ClassifiedExpense>) -> Self {
        let risk_score = risk_score(&expenses);
        let total_deductible = expenses.iter().map(|e| e.deductible_amount).sum();
        Self {
            expenses,
            risk_score,
            total_deductible,
        }
    }
}

/// Amount-weighted average of category weights, floored and clamped to
/// 1..=10. Returns 1 when nothing is claimed.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::expenses::{ClassifiedExpense, ExpenseCategory, risk_score};
///
/// let item = |amount, category| ClassifiedExpense {
///     description: String::new(),
///     amount,
///     category,
///     reason: String::new(),
///     confidence: dec!(1),
///     deductible_amount: amount,
/// };
///
/// // (200 × 1 + 150 × 10 + 100 × 5) / 450 = 4.89
/// let expenses = [
///     item(dec!(200), ExpenseCategory::FullDeduction),
///     item(dec!(150), ExpenseCategory::Conflictive),
///     item(dec!(100), ExpenseCategory::PartialDeduction),
/// ];
/// assert_eq!(risk_score(&expenses), 4);
/// assert_eq!(risk_score(&[]), 1);
/// ```
pub fn risk_score(expenses: &[ClassifiedExpense]) -> u8 {
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    if total.is_zero() {
        return MIN_RISK_SCORE;
    }

    let weighted: Decimal = expenses
        .iter()
        .map(|e| e.amount * e.category.risk_weight())
        .sum();
    let average = (weighted / total).floor();

    average
        .clamp(Decimal::from(MIN_RISK_SCORE), Decimal::from(MAX_RISK_SCORE))
        .to_u8()
        .unwrap_or(MIN_RISK_SCORE)
}

/// Produces a deductible amount and risk information for a batch of
/// expenses. Implementations may call out to a remote service.
#[async_trait]
pub trait ExpenseClassifier: Send + Sync {
    async fn classify(
        &self,
        expenses: &[Expense],
        activity_code: &str,
    ) -> Result<ClassifiedExpenses, ClassifierError>;
}

/// Keyword lists used by [`KeywordClassifier`]. Matching is a
/// case-insensitive substring test. A list missing from a rules file keeps
/// its built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub full: Vec<String>,
    pub partial: Vec<String>,
    pub conflictive: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect();
        Self {
            full: words(&["server", "cloud", "software", "ordenador", "licencia"]),
            partial: words(&["luz", "agua", "internet", "casa", "alquiler"]),
            conflictive: words(&["comida", "restaurante", "viaje", "ropa", "traje"]),
        }
    }
}

impl KeywordRules {
    /// Lowercases every keyword so matching is case-insensitive on both
    /// sides.
    fn normalized(self) -> Self {
        let lower = |list: Vec<String>| list.into_iter().map(|w| w.to_lowercase()).collect();
        Self {
            full: lower(self.full),
            partial: lower(self.partial),
            conflictive: lower(self.conflictive),
        }
    }
}

/// Rule-based stand-in for a model-backed classifier.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    rules: KeywordRules,
}

impl KeywordClassifier {
    pub fn new(rules: KeywordRules) -> Self {
        Self {
            rules: rules.normalized(),
        }
    }

    pub fn rules(&self) -> &KeywordRules {
        &self.rules
    }

    fn categorize(
        &self,
        description: &str,
    ) -> (ExpenseCategory, &'static str, Decimal) {
        let description = description.to_lowercase();
        let hit = |list: &[String]| list.iter().any(|w| description.contains(w.as_str()));

        if hit(&self.rules.full) {
            (
                ExpenseCategory::FullDeduction,
                "matches the directly deductible list",
                dec!(0.95),
            )
        } else if hit(&self.rules.partial) {
            (
                ExpenseCategory::PartialDeduction,
                "matches the household supplies list",
                dec!(0.8),
            )
        } else if hit(&self.rules.conflictive) {
            (
                ExpenseCategory::Conflictive,
                "matches the personal or leisure list",
                dec!(0.6),
            )
        } else {
            (
                ExpenseCategory::PartialDeduction,
                "no keyword matched, manual review required",
                dec!(0.5),
            )
        }
    }
}

#[async_trait]
impl ExpenseClassifier for KeywordClassifier {
    async fn classify(
        &self,
        expenses: &[Expense],
        activity_code: &str,
    ) -> Result<ClassifiedExpenses, ClassifierError> {
        let mut classified = Vec::with_capacity(expenses.len());

        for (index, expense) in expenses.iter().enumerate() {
            if expense.amount < Decimal::ZERO {
                return Err(ClassifierError::NegativeAmount {
                    index,
                    description: expense.description.clone(),
                    amount: expense.amount,
                });
            }

            let (category, reason, confidence) = self.categorize(&expense.description);
            classified.push(ClassifiedExpense {
                description: expense.description.clone(),
                amount: expense.amount,
                category,
                reason: reason.to_string(),
                confidence,
                deductible_amount: expense.amount,
            });
        }

        let result = ClassifiedExpenses::from_expenses(classified);
        debug!(
            activity_code,
            count = result.expenses.len(),
            risk_score = result.risk_score,
            total_deductible = %result.total_deductible,
            "classified expenses"
        );
        Ok(result)
    }
}
