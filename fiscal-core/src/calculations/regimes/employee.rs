//! Salaried employee regime.
//!
//! | Step | Quantity |
//! |------|----------|
//! | 1    | Taxable base: gross − contribution − standard reduction, floored at 0 |
//! | 2    | State tax on the base |
//! | 3    | Regional tax on the base (fallback scale for unknown regions) |
//! | 4    | Official net: gross − contribution − total tax |
//! | 5    | Net: official net − personal non-deductible expenses |
//!
//! Step 5 is the "fair comparison" adjustment: costs a freelancer could
//! deduct still come out of an employee's pocket.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::calculations::regimes::IncomeTax;
use crate::{EmployeeResult, EngineParameters, SimulationInput, TaxTables};

/// Calculator for the employee derivation chain.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeRegime<'a> {
    tables: &'a TaxTables,
    params: &'a EngineParameters,
}

impl<'a> EmployeeRegime<'a> {
    pub fn new(
        tables: &'a TaxTables,
        params: &'a EngineParameters,
    ) -> Self {
        Self { tables, params }
    }

    pub fn calculate(
        &self,
        input: &SimulationInput,
    ) -> EmployeeResult {
        let taxable_base = self.taxable_base(input.employee_gross, input.employee_contribution);
        let tax = IncomeTax::assess(taxable_base, self.tables, &input.region);
        let total_tax = tax.total();

        let official_net = input.employee_gross - input.employee_contribution - total_tax;
        let net = official_net - input.personal_expenses;

        EmployeeResult {
            gross: input.employee_gross,
            contribution: input.employee_contribution,
            standard_reduction: self.params.standard_reduction,
            taxable_base,
            state_tax: tax.state,
            regional_tax: tax.regional,
            total_tax,
            official_net,
            personal_expenses: input.personal_expenses,
            net,
        }
    }

    /// Income tax on a salary whose contributions are paid elsewhere, as
    /// for a company administrator. Returns `(taxable_base, total_tax)`.
    pub(crate) fn salary_tax(
        &self,
        gross: Decimal,
        region: &str,
    ) -> (Decimal, Decimal) {
        let taxable_base = self.taxable_base(gross, Decimal::ZERO);
        let tax = IncomeTax::assess(taxable_base, self.tables, region);
        (taxable_base, tax.total())
    }

    fn taxable_base(
        &self,
        gross: Decimal,
        contribution: Decimal,
    ) -> Decimal {
        non_negative(gross - contribution - self.params.standard_reduction)
    }
}
