//! HTTP listener configuration.
//!
//! # Environment Variables
//!
//! - `SALES_WEB_API_HOST`: API listener address (default `0.0.0.0:3000`)
//! - `SALES_WEB_DEBUG_HOST`: debug listener address (default `0.0.0.0:4000`)
//! - `SALES_WEB_SHUTDOWN_TIMEOUT`: seconds in-flight requests get to finish
//!   once shutdown starts (default 20)
//! - `SALES_WEB_REQUEST_TIMEOUT`: seconds a single request may take (default 10)

use std::time::Duration;

use crate::{ConfigError, Lookup, env_lookup, seconds_or, var};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebConfig {
    pub api_host: String,
    pub debug_host: String,
    pub shutdown_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0:3000".to_string(),
            debug_host: "0.0.0.0:4000".to_string(),
            shutdown_timeout: Duration::from_secs(20),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            api_host: var(lookup, "SALES_WEB_API_HOST").unwrap_or(defaults.api_host),
            debug_host: var(lookup, "SALES_WEB_DEBUG_HOST").unwrap_or(defaults.debug_host),
            shutdown_timeout: seconds_or(lookup, "SALES_WEB_SHUTDOWN_TIMEOUT", 20)?,
            request_timeout: seconds_or(lookup, "SALES_WEB_REQUEST_TIMEOUT", 10)?,
        })
    }
}
