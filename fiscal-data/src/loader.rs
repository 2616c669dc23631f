use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;

use fiscal_core::{Bracket, BracketTable, TableError, TaxTables};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading bracket tables from CSV.
#[derive(Debug, Error, PartialEq)]
pub enum BracketCsvError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown table name '{0}' (expected state, savings or region:<Name>)")]
    UnknownTable(String),

    #[error("table '{table}' is invalid: {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: TableError,
    },
}

impl From<csv::Error> for BracketCsvError {
    fn from(err: csv::Error) -> Self {
        BracketCsvError::CsvParse(err.to_string())
    }
}

/// Reference table a CSV row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableName {
    State,
    Savings,
    Region(String),
}

impl FromStr for TableName {
    type Err = BracketCsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "state" => Ok(Self::State),
            "savings" => Ok(Self::Savings),
            other => match other.strip_prefix("region:") {
                Some(region) if !region.trim().is_empty() => {
                    Ok(Self::Region(region.trim().to_string()))
                }
                _ => Err(BracketCsvError::UnknownTable(s.to_string())),
            },
        }
    }
}

impl std::fmt::Display for TableName {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::State => f.write_str("state"),
            Self::Savings => f.write_str("savings"),
            Self::Region(name) => write!(f, "region:{name}"),
        }
    }
}

/// A single record from the bracket CSV file.
///
/// - `table`: `state`, `savings`, or `region:<Name>`
/// - `upper_bound`: upper edge of the bracket (empty for the open top bracket)
/// - `rate`: marginal rate as a decimal (e.g., 0.19 for 19%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub table: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables kept in a CSV file.
///
/// Rows are grouped by table name in file order; each group becomes one
/// validated [`BracketTable`] that replaces the table of the same name in
/// the reference data.
pub struct BracketCsvLoader;

impl BracketCsvLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketCsvError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into validated tables keyed by name.
    pub fn build_tables(
        records: &[BracketRecord]
    ) -> Result<BTreeMap<TableName, BracketTable>, BracketCsvError> {
        let mut groups: BTreeMap<TableName, Vec<Bracket>> = BTreeMap::new();

        for record in records {
            let name: TableName = record.table.parse()?;
            let bracket = match record.upper_bound {
                Some(upper_bound) => Bracket::Capped {
                    upper_bound,
                    rate: record.rate,
                },
                None => Bracket::Open { rate: record.rate },
            };
            groups.entry(name).or_default().push(bracket);
        }

        groups
            .into_iter()
            .map(|(name, brackets)| {
                BracketTable::new(brackets)
                    .map(|table| (name.clone(), table))
                    .map_err(|source| BracketCsvError::InvalidTable {
                        table: name.to_string(),
                        source,
                    })
            })
            .collect()
    }

    /// Replace tables in `tables` with the CSV-provided ones.
    ///
    /// A region matching the fallback name replaces the fallback scale; any
    /// other region is added or replaced. Returns the number of tables
    /// applied.
    pub fn apply(
        tables: &mut TaxTables,
        overrides: BTreeMap<TableName, BracketTable>,
    ) -> usize {
        let mut applied = 0;

        for (name, table) in overrides {
            info!(table = %name, brackets = table.len(), "replacing table from CSV");
            match name {
                TableName::State => tables.state = table,
                TableName::Savings => tables.savings = table,
                TableName::Region(region) if region == tables.fallback_region_name => {
                    tables.fallback_region = table;
                }
                TableName::Region(region) => {
                    tables.regions.insert(region, table);
                }
            }
            applied += 1;
        }

        applied
    }
}
