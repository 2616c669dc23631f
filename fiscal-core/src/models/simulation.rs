use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::EngineParameters;

/// Inputs shared by all three regime derivations.
///
/// Monetary fields are expected to be non-negative; range checks happen at
/// the request boundary, not in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Annual gross salary as an employee.
    pub employee_gross: Decimal,

    /// Employee social contributions withheld from the salary.
    pub employee_contribution: Decimal,

    /// Employer social contributions. Echoed only, never used in a net figure.
    pub company_contribution: Decimal,

    /// Costs the employee pays but cannot deduct (home internet, laptop...).
    pub personal_expenses: Decimal,

    /// Annual gross revenue when invoicing as freelancer or company.
    pub freelancer_revenue: Decimal,

    /// Deductible expenses of the activity, as produced by the classifier.
    pub freelancer_expenses: Decimal,

    /// Region whose income tax scale applies.
    pub region: String,

    /// Selects the preferential corporate rate for newly created companies.
    #[serde(default)]
    pub is_new_company: bool,

    /// Gross salary the company pays its administrator. Zero routes all
    /// profit through dividends.
    #[serde(default)]
    pub administrator_salary: Decimal,
}

impl SimulationInput {
    /// Builds an input whose contributions are estimated from `gross` using
    /// the configured contribution rates. Revenue defaults to the same gross
    /// figure so the three regimes compare like for like.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fiscal_core::{EngineParameters, SimulationInput};
    ///
    /// let input = SimulationInput::with_estimated_contributions(
    ///     dec!(30000),
    ///     "Madrid",
    ///     &EngineParameters::default(),
    /// );
    ///
    /// assert_eq!(input.employee_contribution, dec!(1905));
    /// assert_eq!(input.company_contribution, dec!(8970));
    /// assert_eq!(input.freelancer_revenue, dec!(30000));
    /// ```
    pub fn with_estimated_contributions(
        gross: Decimal,
        region: impl Into<String>,
        params: &EngineParameters,
    ) -> Self {
        Self {
            employee_gross: gross,
            employee_contribution: gross * params.employee_contribution_rate,
            company_contribution: gross * params.company_contribution_rate,
            personal_expenses: Decimal::ZERO,
            freelancer_revenue: gross,
            freelancer_expenses: Decimal::ZERO,
            region: region.into(),
            is_new_company: false,
            administrator_salary: Decimal::ZERO,
        }
    }
}

/// The three legal structures compared by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Employee,
    Freelancer,
    LimitedCompany,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Employee, Regime::Freelancer, Regime::LimitedCompany];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Freelancer => "Freelancer",
            Self::LimitedCompany => "Limited company",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Employee derivation: gross → taxable base → income tax → net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResult {
    pub gross: Decimal,
    pub contribution: Decimal,
    pub standard_reduction: Decimal,
    pub taxable_base: Decimal,
    pub state_tax: Decimal,
    pub regional_tax: Decimal,
    pub total_tax: Decimal,
    /// Net salary as shown on the payslip.
    pub official_net: Decimal,
    pub personal_expenses: Decimal,
    /// Official net minus the costs an employee cannot deduct.
    pub net: Decimal,
}

/// Freelancer derivation: revenue → yield → contribution quota → allowance
/// → taxable base → income tax → net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerResult {
    pub revenue: Decimal,
    pub deductible_expenses: Decimal,
    pub net_yield_before_quota: Decimal,
    pub monthly_yield: Decimal,
    pub monthly_quota: Decimal,
    pub annual_quota: Decimal,
    pub net_yield_after_quota: Decimal,
    /// Hard-to-justify expense allowance actually subtracted.
    pub allowance: Decimal,
    pub taxable_base: Decimal,
    pub state_tax: Decimal,
    pub regional_tax: Decimal,
    pub total_tax: Decimal,
    pub net: Decimal,
}

/// Limited-company derivation: revenue → profit → corporate tax →
/// dividend tax → net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResult {
    pub revenue: Decimal,
    pub deductible_expenses: Decimal,
    pub administrator_salary_gross: Decimal,
    pub administrator_salary_tax: Decimal,
    pub administrator_salary_net: Decimal,
    pub corporate_contribution: Decimal,
    pub profit_base: Decimal,
    pub corporate_rate: Decimal,
    pub corporate_tax: Decimal,
    pub distributable_profit: Decimal,
    pub dividend_tax: Decimal,
    pub dividend_net: Decimal,
    pub net: Decimal,
}

/// Side-by-side outcome of one simulation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub input: SimulationInput,
    /// Regional table actually applied (the fallback name for unknown regions).
    pub applied_region: String,
    pub employee: EmployeeResult,
    pub freelancer: FreelancerResult,
    pub company: CompanyResult,
}

impl SimulationResult {
    pub fn net(
        &self,
        regime: Regime,
    ) -> Decimal {
        match regime {
            Regime::Employee => self.employee.net,
            Regime::Freelancer => self.freelancer.net,
            Regime::LimitedCompany => self.company.net,
        }
    }

    /// Regime with the highest net. Ties resolve to the earliest regime in
    /// [`Regime::ALL`].
    pub fn best_regime(&self) -> Regime {
        Regime::ALL
            .into_iter()
            .fold(Regime::Employee, |best, regime| {
                if self.net(regime) > self.net(best) {
                    regime
                } else {
                    best
                }
            })
    }

    /// Net of `regime` minus the employee net.
    pub fn difference_vs_employee(
        &self,
        regime: Regime,
    ) -> Decimal {
        self.net(regime) - self.employee.net
    }
}
