//! Self-employed freelancer regime.
//!
//! | Step | Quantity |
//! |------|----------|
//! | 1    | Net yield before quota: revenue − deductible expenses |
//! | 2    | Monthly quota looked up on step 1 / 12, annualized × 12 |
//! | 3    | Net yield after quota: step 1 − annual quota |
//! | 4    | Allowance: min(rate × step 3, cap) |
//! | 5    | Taxable base: step 3 − allowance, floored at 0 |
//! | 6    | State and regional tax on the base |
//! | 7    | Net: taxable base − total tax |
//!
//! Step 4 is not floored, so a negative yield produces a negative allowance
//! that widens the base before the zero floor in step 5. Step 7 starts from
//! the taxable base, so the allowance is never added back to the net.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::calculations::quota::{annual_quota, monthly};
use crate::calculations::regimes::IncomeTax;
use crate::{EngineParameters, FreelancerResult, SimulationInput, TaxTables};

/// Calculator for the freelancer derivation chain.
#[derive(Debug, Clone, Copy)]
pub struct FreelancerRegime<'a> {
    tables: &'a TaxTables,
    params: &'a EngineParameters,
}

impl<'a> FreelancerRegime<'a> {
    pub fn new(
        tables: &'a TaxTables,
        params: &'a EngineParameters,
    ) -> Self {
        Self { tables, params }
    }

    pub fn calculate(
        &self,
        input: &SimulationInput,
    ) -> FreelancerResult {
        let net_yield_before_quota = input.freelancer_revenue - input.freelancer_expenses;
        let (monthly_quota, annual_quota) =
            annual_quota(net_yield_before_quota, &self.tables.contribution);
        let net_yield_after_quota = net_yield_before_quota - annual_quota;

        let allowance = self.allowance(net_yield_after_quota);
        let taxable_base = non_negative(net_yield_after_quota - allowance);

        let tax = IncomeTax::assess(taxable_base, self.tables, &input.region);
        let total_tax = tax.total();

        FreelancerResult {
            revenue: input.freelancer_revenue,
            deductible_expenses: input.freelancer_expenses,
            net_yield_before_quota,
            monthly_yield: monthly(net_yield_before_quota),
            monthly_quota,
            annual_quota,
            net_yield_after_quota,
            allowance,
            taxable_base,
            state_tax: tax.state,
            regional_tax: tax.regional,
            total_tax,
            net: taxable_base - total_tax,
        }
    }

    /// Hard-to-justify expense allowance, capped from above only.
    fn allowance(
        &self,
        net_yield_after_quota: Decimal,
    ) -> Decimal {
        (net_yield_after_quota * self.params.allowance_rate).min(self.params.allowance_cap)
    }
}
