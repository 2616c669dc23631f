//! Keyword rules for the expense classifier, read from TOML.

use std::io::ErrorKind;
use std::path::Path;

use fiscal_core::expenses::KeywordRules;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rules file {path} is not valid TOML: {reason}")]
    Parse { path: String, reason: String },
}

/// Parses a rules document. Lists it leaves out keep their defaults.
pub fn parse_rules(text: &str) -> Result<KeywordRules, toml::de::Error> {
    toml::from_str(text)
}

/// Reads keyword rules from `path`, using the built-in lists when the file
/// does not exist.
pub async fn load_rules(path: &Path) -> Result<KeywordRules, RulesError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "rules file not found, using built-in keywords");
            return Ok(KeywordRules::default());
        }
        Err(source) => {
            return Err(RulesError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    parse_rules(&text).map_err(|e| RulesError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
