use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use common::CredentialRegistry;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Remote report store endpoint.
    pub endpoint: String,
    /// Directory holding the cached blobs (reports, session, outbox).
    pub data_dir: String,
    /// Identity -> secret tables, one per role.
    #[serde(default)]
    pub registry: CredentialRegistry,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(ConfigError::Io)?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "endpoint is required".to_string(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "endpoint must be an http(s) URL (got '{}')",
                self.endpoint
            )));
        }
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "data_dir is required".to_string(),
            ));
        }
        Ok(())
    }
}
