//! Small hand-checkable reference tables shared by unit tests.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    Bracket, BracketTable, ContributionSchedule, ContributionTier, CorporateRates,
    EngineParameters, ReferenceData, SimulationInput, TaxTables,
};

fn table(brackets: &[(Option<Decimal>, Decimal)]) -> BracketTable {
    let brackets = brackets
        .iter()
        .map(|&(bound, rate)| match bound {
            Some(upper_bound) => Bracket::Capped { upper_bound, rate },
            None => Bracket::Open { rate },
        })
        .collect();
    BracketTable::new(brackets).expect("fixture table must be valid")
}

fn tier(min: Decimal, max: Decimal, quota: Decimal) -> ContributionTier {
    ContributionTier {
        income_min: min,
        income_max: max,
        quota: Some(quota),
    }
}

/// State 10/20/30%, region "Norte" 5/10%, fallback "Resto" 10/15%,
/// savings 19/21/23%, corporate 25% (15% new), quota tiers 200/300/400
/// with a 500 fallback.
pub(crate) fn test_tables() -> TaxTables {
    let mut regions = BTreeMap::new();
    regions.insert(
        "Norte".to_string(),
        table(&[(Some(dec!(10000)), dec!(0.05)), (None, dec!(0.10))]),
    );

    TaxTables {
        state: table(&[
            (Some(dec!(10000)), dec!(0.10)),
            (Some(dec!(20000)), dec!(0.20)),
            (None, dec!(0.30)),
        ]),
        regions,
        fallback_region_name: "Resto".to_string(),
        fallback_region: table(&[(Some(dec!(20000)), dec!(0.10)), (None, dec!(0.15))]),
        contribution: ContributionSchedule::new(
            vec![
                tier(dec!(0), dec!(1000), dec!(200)),
                tier(dec!(1000), dec!(2000), dec!(300)),
                tier(dec!(2000), dec!(4000), dec!(400)),
            ],
            dec!(500),
        )
        .expect("fixture schedule must be valid"),
        savings: table(&[
            (Some(dec!(6000)), dec!(0.19)),
            (Some(dec!(50000)), dec!(0.21)),
            (None, dec!(0.23)),
        ]),
        corporate_rates: CorporateRates {
            general: dec!(0.25),
            new_entity: dec!(0.15),
        },
    }
}

pub(crate) fn test_reference_data() -> ReferenceData {
    ReferenceData {
        tables: test_tables(),
        parameters: EngineParameters::default(),
    }
}

/// Employee on 30000 with 1905 contributions, freelancer on 40000 revenue
/// with 4000 expenses, both in "Norte".
pub(crate) fn test_input() -> SimulationInput {
    SimulationInput {
        employee_gross: dec!(30000),
        employee_contribution: dec!(1905),
        company_contribution: dec!(8970),
        personal_expenses: dec!(500),
        freelancer_revenue: dec!(40000),
        freelancer_expenses: dec!(4000),
        region: "Norte".to_string(),
        is_new_company: false,
        administrator_salary: dec!(0),
    }
}
