mod bracket;
mod contribution;
mod parameters;
mod simulation;
mod tax_tables;

pub use bracket::{Bracket, BracketTable, TableError};
pub use contribution::{ContributionSchedule, ContributionTier};
pub use parameters::{EngineParameters, ParameterError};
pub use simulation::{
    CompanyResult, EmployeeResult, FreelancerResult, Regime, SimulationInput, SimulationResult,
};
pub use tax_tables::{CorporateRates, ReferenceData, RegionalScale, TaxTables};
