use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{BracketTable, ContributionSchedule, EngineParameters};

/// Corporate income tax rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateRates {
    pub general: Decimal,
    pub new_entity: Decimal,
}

impl CorporateRates {
    pub fn rate_for(&self, is_new_company: bool) -> Decimal {
        if is_new_company {
            self.new_entity
        } else {
            self.general
        }
    }
}

/// Regional income tax scale resolved for a simulation.
#[derive(Debug, Clone, Copy)]
pub struct RegionalScale<'a> {
    /// Name of the table that was applied.
    pub name: &'a str,
    pub table: &'a BracketTable,
    /// True when the requested region was unknown and the fallback applied.
    pub is_fallback: bool,
}

/// Read-only tax reference data consumed by the regime simulator.
///
/// Built once at startup and shared between concurrent simulations. The
/// fallback regional table is held apart from the named regions so an
/// unknown region can always be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTables {
    pub state: BracketTable,
    pub regions: BTreeMap<String, BracketTable>,
    pub fallback_region_name: String,
    pub fallback_region: BracketTable,
    pub contribution: ContributionSchedule,
    pub savings: BracketTable,
    pub corporate_rates: CorporateRates,
}

impl TaxTables {
    /// Resolves the regional scale, substituting the fallback table for
    /// regions missing from the reference data.
    pub fn regional_scale(
        &self,
        region: &str,
    ) -> RegionalScale<'_> {
        match self.regions.get_key_value(region) {
            Some((name, table)) => RegionalScale {
                name: name.as_str(),
                table,
                is_fallback: false,
            },
            None => {
                debug!(
                    region,
                    fallback = %self.fallback_region_name,
                    "region not in reference data, using fallback scale"
                );
                RegionalScale {
                    name: self.fallback_region_name.as_str(),
                    table: &self.fallback_region,
                    is_fallback: true,
                }
            }
        }
    }

    /// Region names a caller may offer, fallback included.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(self.fallback_region_name.as_str()))
    }
}

/// Everything the engine needs from the external dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceData {
    pub tables: TaxTables,
    pub parameters: EngineParameters,
}
