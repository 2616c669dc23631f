use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building reference tables from raw data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no entries")]
    Empty,

    #[error("rate at position {index} must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("upper bound at position {index} must be positive, got {bound}")]
    NonPositiveBound { index: usize, bound: Decimal },

    #[error("upper bound at position {index} ({bound}) does not exceed the previous bound ({previous})")]
    BoundsNotIncreasing {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    #[error("open bracket at position {index} is not the last entry")]
    OpenBracketNotLast { index: usize },

    #[error("tier at position {index} has income_min {min} above income_max {max}")]
    InvertedTier {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("tier at position {index} starts at {min}, not above the previous tier start {previous_min}")]
    TiersNotIncreasing {
        index: usize,
        min: Decimal,
        previous_min: Decimal,
    },

    #[error("quota must be non-negative, got {0}")]
    NegativeQuota(Decimal),
}

/// One slice of a progressive tax scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    /// Taxes the portion of the base between the previous cap and `upper_bound`.
    Capped { upper_bound: Decimal, rate: Decimal },
    /// Taxes everything left above the last capped bound.
    Open { rate: Decimal },
}

impl Bracket {
    pub fn rate(&self) -> Decimal {
        match *self {
            Bracket::Capped { rate, .. } | Bracket::Open { rate } => rate,
        }
    }

    pub fn upper_bound(&self) -> Option<Decimal> {
        match *self {
            Bracket::Capped { upper_bound, .. } => Some(upper_bound),
            Bracket::Open { .. } => None,
        }
    }
}

/// An ordered, validated progressive tax scale.
///
/// Construction through [`BracketTable::new`] guarantees the invariants the
/// bracket calculator relies on: capped bounds are positive and strictly
/// increasing, there is at most one open bracket and it comes last, and every
/// rate lies in `[0, 1]`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::{Bracket, BracketTable};
///
/// let table = BracketTable::new(vec![
///     Bracket::Capped { upper_bound: dec!(10000), rate: dec!(0.10) },
///     Bracket::Open { rate: dec!(0.30) },
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.top_rate(), dec!(0.30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable(Vec<Bracket>);

impl BracketTable {
    /// Validates and wraps an ordered list of brackets.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] describing the first offending entry.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, TableError> {
        if brackets.is_empty() {
            return Err(TableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            let rate = bracket.rate();
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(TableError::InvalidRate { index, rate });
            }

            match *bracket {
                Bracket::Capped { upper_bound, .. } => {
                    if upper_bound <= Decimal::ZERO {
                        return Err(TableError::NonPositiveBound {
                            index,
                            bound: upper_bound,
                        });
                    }
                    if index > 0 && upper_bound <= previous {
                        return Err(TableError::BoundsNotIncreasing {
                            index,
                            bound: upper_bound,
                            previous,
                        });
                    }
                    previous = upper_bound;
                }
                Bracket::Open { .. } => {
                    if index != last {
                        return Err(TableError::OpenBracketNotLast { index });
                    }
                }
            }
        }

        Ok(Self(brackets))
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rate of the last bracket in the table.
    pub fn top_rate(&self) -> Decimal {
        self.0.last().map(Bracket::rate).unwrap_or(Decimal::ZERO)
    }
}

impl AsRef<[Bracket]> for BracketTable {
    fn as_ref(&self) -> &[Bracket] {
        &self.0
    }
}
