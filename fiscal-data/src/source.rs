use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fiscal_core::{ReferenceData, ReferenceDataSource, SourceError};
use tracing::info;

use crate::dataset::parse_dataset;
use crate::loader::BracketCsvLoader;

/// Reference data read from a TOML dataset on disk, optionally with some
/// bracket tables replaced from a CSV file.
#[derive(Debug, Clone)]
pub struct TomlFileSource {
    path: PathBuf,
    bracket_csv: Option<PathBuf>,
}

impl TomlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bracket_csv: None,
        }
    }

    pub fn with_bracket_csv(
        mut self,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.bracket_csv = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn apply_bracket_csv(
        &self,
        path: &Path,
        data: &mut ReferenceData,
    ) -> Result<(), SourceError> {
        let source_name = path.display().to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SourceError::Unavailable {
                source_name: source_name.clone(),
                reason: e.to_string(),
            })?;

        let records =
            BracketCsvLoader::parse(bytes.as_slice()).map_err(|e| SourceError::Parse {
                source_name: source_name.clone(),
                reason: e.to_string(),
            })?;
        let tables =
            BracketCsvLoader::build_tables(&records).map_err(|e| SourceError::InvalidTable {
                table: source_name.clone(),
                reason: e.to_string(),
            })?;

        let applied = BracketCsvLoader::apply(&mut data.tables, tables);
        info!(path = %source_name, applied, "applied bracket overrides");
        Ok(())
    }
}

#[async_trait]
impl ReferenceDataSource for TomlFileSource {
    fn describe(&self) -> String {
        match &self.bracket_csv {
            Some(csv) => format!("{} + {}", self.path.display(), csv.display()),
            None => self.path.display().to_string(),
        }
    }

    async fn load(&self) -> Result<ReferenceData, SourceError> {
        let source_name = self.path.display().to_string();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Unavailable {
                source_name: source_name.clone(),
                reason: e.to_string(),
            })?;

        let mut data = parse_dataset(&text).map_err(|e| e.into_source_error(&source_name))?;

        if let Some(csv) = &self.bracket_csv {
            self.apply_bracket_csv(csv, &mut data).await?;
        }

        info!(
            source = %self.describe(),
            regions = data.tables.regions.len(),
            "loaded reference data"
        );
        Ok(data)
    }
}
