//! Per-regime derivation chains.
//!
//! Every regime turns the shared [`crate::SimulationInput`] into a taxable
//! base its own way and then reuses the same bracket calculator and
//! reference tables.

pub mod company;
pub mod employee;
pub mod freelancer;

pub use company::CompanyRegime;
pub use employee::EmployeeRegime;
pub use freelancer::FreelancerRegime;

use rust_decimal::Decimal;

use crate::TaxTables;
use crate::calculations::compute_tax;

/// State and regional income tax on one taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IncomeTax {
    pub state: Decimal,
    pub regional: Decimal,
}

impl IncomeTax {
    pub(crate) fn assess(
        base: Decimal,
        tables: &TaxTables,
        region: &str,
    ) -> Self {
        let scale = tables.regional_scale(region);
        Self {
            state: compute_tax(base, tables.state.brackets()),
            regional: compute_tax(base, scale.table.brackets()),
        }
    }

    pub(crate) fn total(&self) -> Decimal {
        self.state + self.regional
    }
}
