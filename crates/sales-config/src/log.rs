//! Logging configuration.
//!
//! - `LOG_LEVEL`: level for the service's own targets (default `info`)
//! - `LOG_FORMAT`: `compact` (default) or `json` console output
//! - `LOG_DIR`: when set, structured JSON logs are also written to a daily
//!   rolling file in this directory

use std::str::FromStr;

use crate::{ConfigError, Lookup, env_lookup, parse_or, var};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            level: var(lookup, "LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: parse_or(lookup, "LOG_FORMAT", LogFormat::Compact)?,
            dir: var(lookup, "LOG_DIR"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_lookup;

    #[test]
    fn test_json_format() {
        let lookup = map_lookup(&[("LOG_FORMAT", "JSON"), ("LOG_DIR", "storage/logs")]);
        let config = LogConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.dir.as_deref(), Some("storage/logs"));
    }

    #[test]
    fn test_unknown_format_is_invalid() {
        let lookup = map_lookup(&[("LOG_FORMAT", "xml")]);
        assert!(LogConfig::from_lookup(&lookup).is_err());
    }
}
