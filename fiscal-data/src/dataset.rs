//! Reference dataset in TOML form.
//!
//! The file carries every table the engine needs. Brackets are written as
//! `{ upper_bound = X, rate = r }` or, for the last one, `{ final = true,
//! rate = r }`. The `parameters` section is optional and falls back to the
//! engine defaults field by field.

use std::collections::BTreeMap;

use fiscal_core::{
    Bracket, BracketTable, ContributionSchedule, ContributionTier, CorporateRates,
    EngineParameters, ParameterError, ReferenceData, SourceError, TableError, TaxTables,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning a TOML document into reference data.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset is not valid TOML: {0}")]
    Parse(String),

    #[error("bracket {index} of '{table}' needs either upper_bound or final = true")]
    MalformedBracket { table: String, index: usize },

    #[error("table '{table}' is invalid: {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: TableError,
    },

    #[error("fallback region '{0}' has no entry in regional_brackets")]
    MissingFallbackRegion(String),

    #[error("corporate rate '{name}' must be between 0 and 1, got {rate}")]
    InvalidCorporateRate { name: &'static str, rate: Decimal },

    #[error("invalid parameters: {0}")]
    Parameters(#[from] ParameterError),
}

impl DatasetError {
    /// Name of the table at fault, when the error concerns one.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::MalformedBracket { table, .. } | Self::InvalidTable { table, .. } => {
                Some(table.as_str())
            }
            Self::MissingFallbackRegion(_) => Some("regional_brackets"),
            Self::InvalidCorporateRate { .. } => Some("corporate_rates"),
            Self::Parameters(_) => Some("parameters"),
            Self::Parse(_) => None,
        }
    }

    /// Converts into the engine-facing error, naming `source_name` when no
    /// single table is at fault.
    pub fn into_source_error(
        self,
        source_name: &str,
    ) -> SourceError {
        match self.table() {
            Some(table) => SourceError::InvalidTable {
                table: table.to_string(),
                reason: self.to_string(),
            },
            None => SourceError::Parse {
                source_name: source_name.to_string(),
                reason: self.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDataset {
    fallback_region: String,
    state_brackets: Vec<RawBracket>,
    savings_brackets: Vec<RawBracket>,
    regional_brackets: BTreeMap<String, Vec<RawBracket>>,
    contribution: RawContribution,
    corporate_rates: CorporateRates,
    #[serde(default)]
    parameters: EngineParameters,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBracket {
    upper_bound: Option<Decimal>,
    #[serde(default, rename = "final")]
    is_final: bool,
    rate: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContribution {
    fallback_quota: Decimal,
    tiers: Vec<ContributionTier>,
}

/// Parses and validates a TOML reference dataset.
///
/// # Examples
///
/// ```
/// let text = r#"
/// fallback_region = "Rest"
/// state_brackets = [{ upper_bound = 10000, rate = 0.1 }, { final = true, rate = 0.2 }]
/// savings_brackets = [{ final = true, rate = 0.19 }]
///
/// [regional_brackets]
/// Rest = [{ final = true, rate = 0.1 }]
///
/// [contribution]
/// fallback_quota = 590
/// tiers = [{ income_min = 0, income_max = 1000, quota = 230 }]
///
/// [corporate_rates]
/// general = 0.25
/// new_entity = 0.15
/// "#;
///
/// let data = fiscal_data::parse_dataset(text).unwrap();
/// assert_eq!(data.tables.fallback_region_name, "Rest");
/// assert!(data.tables.regions.is_empty());
/// ```
pub fn parse_dataset(text: &str) -> Result<ReferenceData, DatasetError> {
    let raw: RawDataset = toml::from_str(text).map_err(|e| DatasetError::Parse(e.to_string()))?;
    build(raw)
}

fn build(raw: RawDataset) -> Result<ReferenceData, DatasetError> {
    raw.parameters.validate()?;

    let state = bracket_table("state_brackets", raw.state_brackets)?;
    let savings = bracket_table("savings_brackets", raw.savings_brackets)?;

    let mut regions = BTreeMap::new();
    for (name, brackets) in raw.regional_brackets {
        let table = bracket_table(&format!("regional_brackets.{name}"), brackets)?;
        regions.insert(name, table);
    }
    let fallback_region = regions
        .remove(&raw.fallback_region)
        .ok_or_else(|| DatasetError::MissingFallbackRegion(raw.fallback_region.clone()))?;

    let contribution =
        ContributionSchedule::new(raw.contribution.tiers, raw.contribution.fallback_quota)
            .map_err(|source| DatasetError::InvalidTable {
                table: "contribution".to_string(),
                source,
            })?;

    validate_corporate_rate("general", raw.corporate_rates.general)?;
    validate_corporate_rate("new_entity", raw.corporate_rates.new_entity)?;

    debug!(
        regions = regions.len(),
        tiers = contribution.tiers().len(),
        fallback = %raw.fallback_region,
        "parsed reference dataset"
    );

    Ok(ReferenceData {
        tables: TaxTables {
            state,
            regions,
            fallback_region_name: raw.fallback_region,
            fallback_region,
            contribution,
            savings,
            corporate_rates: raw.corporate_rates,
        },
        parameters: raw.parameters,
    })
}

fn bracket_table(
    table: &str,
    raw: Vec<RawBracket>,
) -> Result<BracketTable, DatasetError> {
    let brackets = raw
        .into_iter()
        .enumerate()
        .map(|(index, bracket)| match (bracket.is_final, bracket.upper_bound) {
            (true, None) => Ok(Bracket::Open { rate: bracket.rate }),
            (false, Some(upper_bound)) => Ok(Bracket::Capped {
                upper_bound,
                rate: bracket.rate,
            }),
            _ => Err(DatasetError::MalformedBracket {
                table: table.to_string(),
                index,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    BracketTable::new(brackets).map_err(|source| DatasetError::InvalidTable {
        table: table.to_string(),
        source,
    })
}

fn validate_corporate_rate(
    name: &'static str,
    rate: Decimal,
) -> Result<(), DatasetError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DatasetError::InvalidCorporateRate { name, rate });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use fiscal_core::calculations::annual_quota;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL: &str = r#"
fallback_region = "Resto"
state_brackets = [
    { upper_bound = 10000, rate = 0.10 },
    { final = true, rate = 0.20 },
]
savings_brackets = [{ final = true, rate = 0.19 }]

[regional_brackets]
Norte = [{ upper_bound = 10000, rate = 0.05 }, { final = true, rate = 0.10 }]
Resto = [{ final = true, rate = 0.15 }]

[contribution]
fallback_quota = 590
tiers = [
    { income_min = 0, income_max = 1000, quota = 200 },
    { income_min = 1000, income_max = 2000 },
]

[corporate_rates]
general = 0.25
new_entity = 0.15
"#;

    fn with(
        find: &str,
        replace: &str,
    ) -> String {
        assert!(MINIMAL.contains(find), "fixture does not contain {find}");
        MINIMAL.replacen(find, replace, 1)
    }

    #[test]
    fn parses_minimal_dataset() {
        let data = parse_dataset(MINIMAL).expect("minimal dataset should parse");

        assert_eq!(data.tables.state.len(), 2);
        assert_eq!(data.tables.state.top_rate(), dec!(0.20));
        assert_eq!(data.tables.regions.keys().collect::<Vec<_>>(), vec!["Norte"]);
        assert_eq!(data.tables.fallback_region_name, "Resto");
        assert_eq!(data.tables.fallback_region.top_rate(), dec!(0.15));
        assert_eq!(data.tables.corporate_rates.general, dec!(0.25));
        assert_eq!(data.parameters, EngineParameters::default());
    }

    #[test]
    fn omitted_quota_is_kept_as_none() {
        let data = parse_dataset(MINIMAL).expect("minimal dataset should parse");

        let tiers = data.tables.contribution.tiers();
        assert_eq!(tiers[0].quota, Some(dec!(200)));
        assert_eq!(tiers[1].quota, None);
        assert_eq!(data.tables.contribution.fallback_quota(), dec!(590));
    }

    #[test]
    fn partial_parameters_keep_other_defaults() {
        let text = format!("{MINIMAL}\n[parameters]\nallowance_cap = 3000\n");

        let data = parse_dataset(&text).expect("dataset should parse");

        assert_eq!(data.parameters.allowance_cap, dec!(3000));
        assert_eq!(data.parameters.standard_reduction, dec!(2000));
    }

    #[test]
    fn rejects_missing_fallback_region() {
        let text = with(r#"fallback_region = "Resto""#, r#"fallback_region = "Sur""#);

        let error = parse_dataset(&text).unwrap_err();

        assert_eq!(error, DatasetError::MissingFallbackRegion("Sur".to_string()));
    }

    #[test]
    fn rejects_open_bracket_before_last() {
        let text = with(
            "Norte = [{ upper_bound = 10000, rate = 0.05 }, { final = true, rate = 0.10 }]",
            "Norte = [{ final = true, rate = 0.05 }, { upper_bound = 10000, rate = 0.10 }]",
        );

        let error = parse_dataset(&text).unwrap_err();

        assert_eq!(
            error,
            DatasetError::InvalidTable {
                table: "regional_brackets.Norte".to_string(),
                source: TableError::OpenBracketNotLast { index: 0 },
            }
        );
        assert_eq!(error.table(), Some("regional_brackets.Norte"));
    }

    #[test]
    fn rejects_bracket_without_bound_or_final() {
        let text = with(
            "savings_brackets = [{ final = true, rate = 0.19 }]",
            "savings_brackets = [{ rate = 0.19 }]",
        );

        let error = parse_dataset(&text).unwrap_err();

        assert_eq!(
            error,
            DatasetError::MalformedBracket {
                table: "savings_brackets".to_string(),
                index: 0,
            }
        );
    }

    #[test]
    fn loads_cent_step_tiers_and_gap_pays_fallback() {
        let text = with(
            "{ income_min = 1000, income_max = 2000 }",
            "{ income_min = 1000.01, income_max = 2000, quota = 220 }",
        );

        let data = parse_dataset(&text).expect("non-overlapping tiers should load");
        let contribution = &data.tables.contribution;

        assert_eq!(contribution.tiers()[1].income_min, dec!(1000.01));
        // 12000.06 a year is 1000.005 a month, between the two tiers.
        assert_eq!(annual_quota(dec!(12000.06), contribution), (dec!(590), dec!(7080)));
        assert_eq!(annual_quota(dec!(12000), contribution).0, dec!(200));
        assert_eq!(annual_quota(dec!(18000), contribution).0, dec!(220));
    }

    #[test]
    fn rejects_misspelled_tier_key() {
        let text = with("quota = 200", "quoat = 200");

        let error = parse_dataset(&text).unwrap_err();

        assert!(matches!(error, DatasetError::Parse(_)));
    }

    #[test]
    fn rejects_corporate_rate_above_one() {
        let text = with("general = 0.25", "general = 25");

        let error = parse_dataset(&text).unwrap_err();

        assert_eq!(
            error,
            DatasetError::InvalidCorporateRate {
                name: "general",
                rate: dec!(25),
            }
        );
    }

    #[test]
    fn rejects_invalid_parameters() {
        let text = format!("{MINIMAL}\n[parameters]\nallowance_rate = 1.5\n");

        let error = parse_dataset(&text).unwrap_err();

        assert_eq!(error.table(), Some("parameters"));
    }

    #[test]
    fn rejects_unknown_section() {
        let text = format!("{MINIMAL}\n[irpf_extra]\nrate = 0.1\n");

        let error = parse_dataset(&text).unwrap_err();

        assert!(matches!(error, DatasetError::Parse(_)));
        assert_eq!(error.table(), None);
    }

    #[test]
    fn table_errors_map_to_invalid_table_source_error() {
        let text = with(r#"fallback_region = "Resto""#, r#"fallback_region = "Sur""#);

        let error = parse_dataset(&text)
            .unwrap_err()
            .into_source_error("tax_data.toml");

        assert_eq!(
            error,
            SourceError::InvalidTable {
                table: "regional_brackets".to_string(),
                reason: "fallback region 'Sur' has no entry in regional_brackets".to_string(),
            }
        );
    }
}
