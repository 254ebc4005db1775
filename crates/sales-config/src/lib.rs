//! # Sales Config
//!
//! Configuration types for the Sales API, loaded from environment variables:
//!
//! - [`web`]: listener addresses and timeouts
//! - [`auth`]: signing key location, active key id, token lifetime
//! - [`cors`]: allowed origins
//! - [`log`]: log level, format and optional file output
//!
//! Every variable is optional and falls back to a development default, but a
//! value that is present and cannot be parsed is an error: the service must
//! not start with a configuration it does not understand.
//!
//! # Example
//!
//! ```ignore
//! use sales_config::Config;
//!
//! let config = Config::from_env()?;
//! println!("api listening on {}", config.web.api_host);
//! ```

pub mod auth;
pub mod cors;
pub mod log;
pub mod web;

use std::str::FromStr;
use std::time::Duration;

pub use auth::AuthConfig;
pub use cors::CorsConfig;
pub use log::{LogConfig, LogFormat};
pub use web::WebConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    Zero { name: String },
    #[error("invalid configuration: {name}={value}")]
    Invalid { name: String, value: String },
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub web: WebConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub log: LogConfig,
}

impl Config {
    /// Loads `.env` (if present) and reads every section from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&env_lookup)
    }

    /// Reads every section through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            web: WebConfig::from_lookup(lookup)?,
            auth: AuthConfig::from_lookup(lookup)?,
            cors: CorsConfig::from_lookup(lookup),
            log: LogConfig::from_lookup(lookup)?,
        })
    }
}

/// Resolves a variable name to its value.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub(crate) fn var(lookup: Lookup<'_>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_or<T: FromStr>(
    lookup: Lookup<'_>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match var(lookup, name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

pub(crate) fn seconds_or(
    lookup: Lookup<'_>,
    name: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    parse_or(lookup, name, default).map(Duration::from_secs)
}

#[cfg(test)]
pub(crate) fn map_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let lookup = map_lookup(&[]);
        let config = Config::from_lookup(&lookup).unwrap();

        assert_eq!(config.web.api_host, "0.0.0.0:3000");
        assert_eq!(config.web.shutdown_timeout, Duration::from_secs(20));
        assert_eq!(config.auth.keys_folder, "zarf/keys");
    }

    #[test]
    fn test_invalid_value_fails_fast() {
        let lookup = map_lookup(&[("SALES_WEB_SHUTDOWN_TIMEOUT", "soon")]);
        let err = Config::from_lookup(&lookup).unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SALES_WEB_SHUTDOWN_TIMEOUT".into(),
                value: "soon".into(),
            }
        );
    }

    #[test]
    fn test_blank_value_uses_default() {
        let lookup = map_lookup(&[("SALES_AUTH_TOKEN_TTL", "  ")]);
        let config = Config::from_lookup(&lookup).unwrap();
        assert_eq!(config.auth.token_ttl, Duration::from_secs(3600));
    }
}
