pub mod dataset;
pub mod loader;
pub mod rules;
pub mod source;

pub use dataset::{DatasetError, parse_dataset};
pub use loader::{BracketCsvError, BracketCsvLoader, BracketRecord, TableName};
pub use rules::{RulesError, load_rules, parse_rules};
pub use source::TomlFileSource;
