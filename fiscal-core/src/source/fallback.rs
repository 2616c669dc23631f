use async_trait::async_trait;
use tracing::{info, warn};

use super::reference::{ReferenceDataSource, SourceError};
use crate::models::ReferenceData;

/// Tries a primary source and falls back to a secondary one when the
/// primary fails, for example a remote table store backed by a local file.
///
/// The secondary error is returned when both fail.
pub struct FallbackSource {
    primary: Box<dyn ReferenceDataSource>,
    secondary: Box<dyn ReferenceDataSource>,
}

impl FallbackSource {
    pub fn new(
        primary: Box<dyn ReferenceDataSource>,
        secondary: Box<dyn ReferenceDataSource>,
    ) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl ReferenceDataSource for FallbackSource {
    fn describe(&self) -> String {
        format!(
            "{} (falling back to {})",
            self.primary.describe(),
            self.secondary.describe()
        )
    }

    async fn load(&self) -> Result<ReferenceData, SourceError> {
        match self.primary.load().await {
            Ok(data) => Ok(data),
            Err(error) => {
                warn!(
                    primary = %self.primary.describe(),
                    %error,
                    "primary reference data source failed"
                );
                let data = self.secondary.load().await?;
                info!(source = %self.secondary.describe(), "loaded reference data from fallback");
                Ok(data)
            }
        }
    }
}
