//! Tax calculation modules for the multi-regime simulation.
//!
//! [`progressive`] and [`quota`] are the two primitive lookups; the
//! [`regimes`] build per-regime derivation chains on top of them and
//! [`simulator`] composes the three chains into one call.

pub mod common;
pub mod progressive;
pub mod quota;
pub mod regimes;
pub mod simulator;

pub use progressive::compute_tax;
pub use quota::{annual_quota, lookup_quota};
pub use regimes::{CompanyRegime, EmployeeRegime, FreelancerRegime};
pub use simulator::RegimeSimulator;
