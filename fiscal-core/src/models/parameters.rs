use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when engine parameters are out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    /// The employee standard reduction must be non-negative.
    #[error("standard reduction must be non-negative, got {0}")]
    InvalidStandardReduction(Decimal),

    /// The hard-to-justify expense allowance rate must be between 0 and 1.
    #[error("allowance rate must be between 0 and 1, got {0}")]
    InvalidAllowanceRate(Decimal),

    /// The allowance cap must be non-negative.
    #[error("allowance cap must be non-negative, got {0}")]
    InvalidAllowanceCap(Decimal),

    /// The fixed corporate contribution must be non-negative.
    #[error("corporate contribution must be non-negative, got {0}")]
    InvalidCorporateContribution(Decimal),

    /// A contribution rate is outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidContributionRate { name: &'static str, value: Decimal },

    /// The minimum gross salary must be non-negative.
    #[error("minimum gross salary must be non-negative, got {0}")]
    InvalidMinimumGrossSalary(Decimal),
}

/// Named constants of the simulation rules.
///
/// These change with regional or annual rule updates, so they live in the
/// reference dataset rather than in code. Every field has a default matching
/// the current rules, which lets a dataset omit the whole section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    /// Fixed reduction applied to employment income before taxation.
    pub standard_reduction: Decimal,

    /// Share of the freelancer's net yield allowed as hard-to-justify expenses.
    pub allowance_rate: Decimal,

    /// Upper limit of the hard-to-justify expense allowance.
    pub allowance_cap: Decimal,

    /// Yearly social contribution a limited company pays for its administrator.
    pub corporate_contribution: Decimal,

    /// Employee share of social contributions, as a fraction of gross salary.
    pub employee_contribution_rate: Decimal,

    /// Employer share of social contributions. Informational only.
    pub company_contribution_rate: Decimal,

    /// Smallest gross salary accepted at the request boundary.
    pub minimum_gross_salary: Decimal,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            standard_reduction: dec!(2000),
            allowance_rate: dec!(0.07),
            allowance_cap: dec!(2000),
            corporate_contribution: dec!(4500),
            employee_contribution_rate: dec!(0.0635),
            company_contribution_rate: dec!(0.299),
            minimum_gross_salary: dec!(12000),
        }
    }
}

impl EngineParameters {
    /// Validates the parameter values.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] for the first value outside its valid range.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fiscal_core::{EngineParameters, ParameterError};
    ///
    /// let params = EngineParameters {
    ///     allowance_rate: dec!(1.5),
    ///     ..EngineParameters::default()
    /// };
    ///
    /// assert_eq!(params.validate(), Err(ParameterError::InvalidAllowanceRate(dec!(1.5))));
    /// ```
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.standard_reduction < Decimal::ZERO {
            return Err(ParameterError::InvalidStandardReduction(
                self.standard_reduction,
            ));
        }
        if self.allowance_rate < Decimal::ZERO || self.allowance_rate > Decimal::ONE {
            return Err(ParameterError::InvalidAllowanceRate(self.allowance_rate));
        }
        if self.allowance_cap < Decimal::ZERO {
            return Err(ParameterError::InvalidAllowanceCap(self.allowance_cap));
        }
        if self.corporate_contribution < Decimal::ZERO {
            return Err(ParameterError::InvalidCorporateContribution(
                self.corporate_contribution,
            ));
        }
        for (name, value) in [
            ("employee_contribution_rate", self.employee_contribution_rate),
            ("company_contribution_rate", self.company_contribution_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ParameterError::InvalidContributionRate { name, value });
            }
        }
        if self.minimum_gross_salary < Decimal::ZERO {
            return Err(ParameterError::InvalidMinimumGrossSalary(
                self.minimum_gross_salary,
            ));
        }
        Ok(())
    }
}
