/// Configuration types for aggexpr
///
/// Configuration is read from JSON and validated before use.

mod engine;

pub use engine::EngineConfig;

use std::path::Path;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl EngineConfig {
    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        debug!(?config, path = %path.display(), "loaded engine configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str() {
        let config = EngineConfig::from_json_str(r#"{"maxRangeLength": 5}"#).unwrap();
        assert_eq!(config.max_range_length, Some(5));
    }

    #[test]
    fn test_from_json_str_rejects_invalid_values() {
        let err = EngineConfig::from_json_str(r#"{"maxRangeLength": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_json_str_rejects_bad_json() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/aggexpr.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
