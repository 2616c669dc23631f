use async_trait::async_trait;
use thiserror::Error;

use crate::models::ReferenceData;

/// Failures while obtaining reference data. Each variant names what failed
/// so callers can report which table or file is at fault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("reference data unavailable from {source_name}: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("reference data from {source_name} could not be parsed: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("invalid reference table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },
}

/// Producer of the tax reference data the engine consumes.
///
/// Loading happens once at startup; the returned data is then shared
/// read-only for the life of the process.
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    /// Human-readable origin, used in logs and errors.
    fn describe(&self) -> String;

    async fn load(&self) -> Result<ReferenceData, SourceError>;
}
