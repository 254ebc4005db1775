//! Token signing configuration.
//!
//! # Environment Variables
//!
//! - `SALES_AUTH_KEYS_FOLDER`: directory holding `<kid>.pem` / `<kid>.pub.pem`
//!   pairs (default `zarf/keys`)
//! - `SALES_AUTH_ACTIVE_KID`: key id used to sign new tokens
//! - `SALES_AUTH_ISSUER`: `iss` claim stamped on issued tokens (default `sales api`)
//! - `SALES_AUTH_TOKEN_TTL`: token lifetime in seconds (default 3600, must be
//!   positive)
//! - `SALES_AUTH_ALGORITHM`: RSA signing algorithm (default `RS256`)

use std::time::Duration;

use crate::{ConfigError, Lookup, env_lookup, seconds_or, var};

pub const DEFAULT_ACTIVE_KID: &str = "54bb2165-71e1-41a6-af3e-7da4a0e1e2c1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub keys_folder: String,
    pub active_kid: String,
    pub issuer: String,
    pub token_ttl: Duration,
    pub algorithm: String,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let token_ttl = seconds_or(lookup, "SALES_AUTH_TOKEN_TTL", 3600)?;
        if token_ttl.is_zero() {
            return Err(ConfigError::Zero {
                name: "SALES_AUTH_TOKEN_TTL".to_string(),
            });
        }

        Ok(Self {
            keys_folder: var(lookup, "SALES_AUTH_KEYS_FOLDER")
                .unwrap_or_else(|| "zarf/keys".to_string()),
            active_kid: var(lookup, "SALES_AUTH_ACTIVE_KID")
                .unwrap_or_else(|| DEFAULT_ACTIVE_KID.to_string()),
            issuer: var(lookup, "SALES_AUTH_ISSUER").unwrap_or_else(|| "sales api".to_string()),
            token_ttl,
            algorithm: var(lookup, "SALES_AUTH_ALGORITHM").unwrap_or_else(|| "RS256".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_lookup;

    #[test]
    fn test_overrides() {
        let lookup = map_lookup(&[
            ("SALES_AUTH_KEYS_FOLDER", "/etc/sales/keys"),
            ("SALES_AUTH_ACTIVE_KID", "k1"),
            ("SALES_AUTH_TOKEN_TTL", "60"),
        ]);
        let config = AuthConfig::from_lookup(&lookup).unwrap();

        assert_eq!(config.keys_folder, "/etc/sales/keys");
        assert_eq!(config.active_kid, "k1");
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.algorithm, "RS256");
    }

    #[test]
    fn test_zero_token_ttl_rejected() {
        let lookup = map_lookup(&[("SALES_AUTH_TOKEN_TTL", "0")]);

        assert_eq!(
            AuthConfig::from_lookup(&lookup),
            Err(ConfigError::Zero {
                name: "SALES_AUTH_TOKEN_TTL".into()
            })
        );
    }
}
