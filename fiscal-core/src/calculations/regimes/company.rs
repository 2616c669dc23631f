//! Limited-company regime.
//!
//! | Step | Quantity |
//! |------|----------|
//! | 1    | Profit base: revenue − expenses − administrator salary − corporate contribution |
//! | 2    | Corporate tax: profit base × rate (new-entity or general), floored at 0 |
//! | 3    | Distributable profit: profit base − corporate tax |
//! | 4    | Dividend tax on step 3 with the savings scale |
//! | 5    | Net: administrator salary net + (step 3 − dividend tax) |
//!
//! The profit base itself is not floored: a loss passes through as a
//! non-positive distributable profit.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::calculations::compute_tax;
use crate::calculations::regimes::EmployeeRegime;
use crate::{CompanyResult, EngineParameters, SimulationInput, TaxTables};

/// Calculator for the limited-company derivation chain.
#[derive(Debug, Clone, Copy)]
pub struct CompanyRegime<'a> {
    tables: &'a TaxTables,
    params: &'a EngineParameters,
}

impl<'a> CompanyRegime<'a> {
    pub fn new(
        tables: &'a TaxTables,
        params: &'a EngineParameters,
    ) -> Self {
        Self { tables, params }
    }

    pub fn calculate(
        &self,
        input: &SimulationInput,
    ) -> CompanyResult {
        let salary_gross = input.administrator_salary;
        let (salary_tax, salary_net) = self.administrator_salary(salary_gross, &input.region);

        let profit_base = input.freelancer_revenue
            - input.freelancer_expenses
            - salary_gross
            - self.params.corporate_contribution;

        let corporate_rate = self.tables.corporate_rates.rate_for(input.is_new_company);
        let corporate_tax = non_negative(profit_base * corporate_rate);
        let distributable_profit = profit_base - corporate_tax;

        let dividend_tax = compute_tax(distributable_profit, self.tables.savings.brackets());
        let dividend_net = distributable_profit - dividend_tax;

        CompanyResult {
            revenue: input.freelancer_revenue,
            deductible_expenses: input.freelancer_expenses,
            administrator_salary_gross: salary_gross,
            administrator_salary_tax: salary_tax,
            administrator_salary_net: salary_net,
            corporate_contribution: self.params.corporate_contribution,
            profit_base,
            corporate_rate,
            corporate_tax,
            distributable_profit,
            dividend_tax,
            dividend_net,
            net: salary_net + dividend_net,
        }
    }

    /// Returns `(income_tax, net)` for the administrator salary. Its social
    /// contribution is already inside the fixed corporate contribution.
    fn administrator_salary(
        &self,
        gross: Decimal,
        region: &str,
    ) -> (Decimal, Decimal) {
        if gross <= Decimal::ZERO {
            return (Decimal::ZERO, Decimal::ZERO);
        }
        let (_, tax) = EmployeeRegime::new(self.tables, self.params).salary_tax(gross, region);
        (tax, gross - tax)
    }
}
