//! The authenticated principal.
//!
//! [`Claims`] is what a token proves: who the caller is and which roles they
//! hold, plus the registered JWT fields bounding the token's lifetime. It is
//! created at login, attached to the request by the authentication
//! middleware after verification and treated as read-only afterwards.

use std::collections::BTreeSet;

use chrono::serde::ts_seconds;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::role::Role;

/// Token payload.
///
/// Timestamps are whole seconds on the wire, so [`Claims::new`] truncates
/// them up front; a validated token compares equal to the claims it was
/// issued from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id.
    #[serde(rename = "sub")]
    pub subject: String,
    pub roles: BTreeSet<Role>,
    #[serde(rename = "iat", with = "ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "nbf", with = "ts_seconds")]
    pub not_before: DateTime<Utc>,
    #[serde(rename = "exp", with = "ts_seconds")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "iss", default)]
    pub issuer: String,
    /// Carried through but not enforced.
    #[serde(rename = "aud", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub audience: BTreeSet<String>,
    #[serde(rename = "jti", default)]
    pub token_id: String,
}

impl Claims {
    /// Builds claims valid from `now` for `ttl`, with a fresh token id.
    pub fn new(
        subject: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
        issuer: impl Into<String>,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> Self {
        let now = now.trunc_subsecs(0);

        Self {
            subject: subject.into(),
            roles: roles.into_iter().collect(),
            issued_at: now,
            not_before: now,
            expires_at: now + ttl,
            issuer: issuer.into(),
            audience: BTreeSet::new(),
            token_id: Uuid::new_v4().to_string(),
        }
    }

    /// Reports whether the claims hold at least one of `required`.
    pub fn authorized(&self, required: &[Role]) -> bool {
        required.iter().any(|role| self.roles.contains(role))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// `aud` may be a single string or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(BTreeSet<String>),
}

/// Payload as decoded off the wire, before the role vocabulary is checked.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    sub: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(with = "ts_seconds")]
    pub(crate) iat: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub(crate) nbf: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub(crate) exp: DateTime<Utc>,
    #[serde(default)]
    iss: String,
    #[serde(default)]
    aud: Option<Audience>,
    #[serde(default)]
    jti: String,
}

impl TryFrom<RawClaims> for Claims {
    type Error = ValidationError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let roles = raw
            .roles
            .iter()
            .map(|name| name.parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let audience = match raw.aud {
            None => BTreeSet::new(),
            Some(Audience::One(aud)) => BTreeSet::from([aud]),
            Some(Audience::Many(aud)) => aud,
        };

        Ok(Self {
            subject: raw.sub,
            roles,
            issued_at: raw.iat,
            not_before: raw.nbf,
            expires_at: raw.exp,
            issuer: raw.iss,
            audience,
            token_id: raw.jti,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_claims() -> Claims {
        Claims::new(
            "45b5fbd3-755f-4379-8f07-a58d4a30fa2f",
            [Role::User],
            "sales api",
            TimeDelta::hours(1),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_sets_time_bounds() {
        let claims = user_claims();
        assert_eq!(claims.not_before, claims.issued_at);
        assert_eq!(claims.expires_at - claims.issued_at, TimeDelta::hours(1));
        assert_eq!(claims.issued_at.timestamp_subsec_nanos(), 0);
        assert!(!claims.token_id.is_empty());
    }

    #[test]
    fn test_authorized_requires_intersection() {
        let user = user_claims();
        assert!(!user.authorized(&[Role::Admin]));
        assert!(user.authorized(&[Role::Admin, Role::User]));

        let mut both = user_claims();
        both.roles.insert(Role::Admin);
        assert!(both.authorized(&[Role::Admin]));
    }

    #[test]
    fn test_no_roles_is_never_authorized() {
        let mut claims = user_claims();
        claims.roles.clear();
        assert!(!claims.authorized(&Role::ALL));
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(user_claims()).unwrap();
        for field in ["sub", "roles", "iat", "nbf", "exp", "iss", "jti"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert!(value.get("aud").is_none());
        assert_eq!(value["roles"], serde_json::json!(["USER"]));
    }

    #[test]
    fn test_raw_claims_reject_unknown_role() {
        let raw: RawClaims = serde_json::from_value(serde_json::json!({
            "sub": "u1",
            "roles": ["USER", "SUPERUSER"],
            "iat": 1_700_000_000,
            "nbf": 1_700_000_000,
            "exp": 1_700_003_600,
        }))
        .unwrap();

        assert_eq!(
            Claims::try_from(raw),
            Err(ValidationError::UnknownRole("SUPERUSER".into()))
        );
    }

    #[test]
    fn test_raw_claims_accept_single_audience() {
        let raw: RawClaims = serde_json::from_value(serde_json::json!({
            "sub": "u1",
            "roles": ["ADMIN"],
            "iat": 1_700_000_000,
            "nbf": 1_700_000_000,
            "exp": 1_700_003_600,
            "aud": "sales-web",
        }))
        .unwrap();

        let claims = Claims::try_from(raw).unwrap();
        assert!(claims.audience.contains("sales-web"));
        assert!(claims.has_role(Role::Admin));
    }
}
