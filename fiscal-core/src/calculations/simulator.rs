//! Three-regime simulation.
//!
//! The simulator borrows the loaded reference data and runs the employee,
//! freelancer, and limited-company chains on the same input. It holds no
//! mutable state, so one instance (or many) can serve concurrent callers.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use rust_decimal_macros::dec;
//! use fiscal_core::calculations::RegimeSimulator;
//! use fiscal_core::{
//!     Bracket, BracketTable, ContributionSchedule, ContributionTier, CorporateRates,
//!     EngineParameters, SimulationInput, TaxTables,
//! };
//!
//! let flat = |rate| BracketTable::new(vec![Bracket::Open { rate }]).unwrap();
//! let tables = TaxTables {
//!     state: flat(dec!(0.10)),
//!     regions: BTreeMap::new(),
//!     fallback_region_name: "Other".to_string(),
//!     fallback_region: flat(dec!(0.10)),
//!     contribution: ContributionSchedule::new(
//!         vec![ContributionTier {
//!             income_min: dec!(0),
//!             income_max: dec!(10000),
//!             quota: Some(dec!(300)),
//!         }],
//!         dec!(590),
//!     )
//!     .unwrap(),
//!     savings: flat(dec!(0.20)),
//!     corporate_rates: CorporateRates { general: dec!(0.25), new_entity: dec!(0.15) },
//! };
//! let params = EngineParameters::default();
//!
//! let input = SimulationInput::with_estimated_contributions(dec!(40000), "Anywhere", &params);
//! let result = RegimeSimulator::new(&tables, &params).simulate(&input);
//!
//! assert_eq!(result.applied_region, "Other");
//! // (40000 - 4500) × 75% × 80%
//! assert_eq!(result.company.net, dec!(21300));
//! ```

use tracing::debug;

use crate::calculations::regimes::{CompanyRegime, EmployeeRegime, FreelancerRegime};
use crate::{EngineParameters, ReferenceData, SimulationInput, SimulationResult, TaxTables};

/// Runs all three regime derivations against shared reference data.
#[derive(Debug, Clone, Copy)]
pub struct RegimeSimulator<'a> {
    tables: &'a TaxTables,
    params: &'a EngineParameters,
}

impl<'a> RegimeSimulator<'a> {
    pub fn new(
        tables: &'a TaxTables,
        params: &'a EngineParameters,
    ) -> Self {
        Self { tables, params }
    }

    pub fn from_reference(data: &'a ReferenceData) -> Self {
        Self::new(&data.tables, &data.parameters)
    }

    /// Simulates every regime for `input` and returns them side by side.
    pub fn simulate(
        &self,
        input: &SimulationInput,
    ) -> SimulationResult {
        let applied_region = self.tables.regional_scale(&input.region).name.to_string();

        let employee = EmployeeRegime::new(self.tables, self.params).calculate(input);
        let freelancer = FreelancerRegime::new(self.tables, self.params).calculate(input);
        let company = CompanyRegime::new(self.tables, self.params).calculate(input);

        debug!(
            region = %applied_region,
            employee_net = %employee.net,
            freelancer_net = %freelancer.net,
            company_net = %company.net,
            "simulation complete"
        );

        SimulationResult {
            input: input.clone(),
            applied_region,
            employee,
            freelancer,
            company,
        }
    }
}
