use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event_log::DEFAULT_LOG_CAPACITY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine settings, typically read from a TOML file.
///
/// ```toml
/// log_capacity = 500
/// command_buffer = 64
/// rules_file = "rules.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of event log entries kept in memory.
    pub log_capacity: usize,
    /// Depth of the command queue feeding the engine task.
    pub command_buffer: usize,
    /// Where [`JsonFileStore::from_config`](crate::JsonFileStore::from_config) keeps rules.
    pub rules_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            command_buffer: 64,
            rules_file: None,
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O or parse failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.log_capacity, 500);
        assert_eq!(config.command_buffer, 64);
        assert!(config.rules_file.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("log_capacity = 20").unwrap();
        assert_eq!(config.log_capacity, 20);
        assert_eq!(config.command_buffer, 64);
    }

    #[test]
    fn full_toml() {
        let config = EngineConfig::from_toml_str(
            "log_capacity = 10\ncommand_buffer = 4\nrules_file = \"/tmp/rules.json\"\n",
        )
        .unwrap();
        assert_eq!(config.rules_file, Some(PathBuf::from("/tmp/rules.json")));
        assert_eq!(config.command_buffer, 4);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(matches!(
            EngineConfig::from_toml_str("log_capacity = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = EngineConfig::load("/definitely/not/here/autoresponder.toml").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
