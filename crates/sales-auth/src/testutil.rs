//! Fixture keys and token helpers for tests.
//!
//! Two fixed RSA key pairs are embedded: [`ACTIVE_KID`] and [`ROTATED_KID`].
//! Helpers panic on failure; they are meant for test code only.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use crate::authority::TokenAuthority;
use crate::claims::Claims;
use crate::keystore::{KeyStore, SigningKeyPair};
use crate::role::Role;

pub const ACTIVE_KID: &str = "active";
pub const ROTATED_KID: &str = "rotated";
pub const TEST_ISSUER: &str = "sales api test";

const ACTIVE_PRIVATE: &str = include_str!("../testdata/active.pem");
const ACTIVE_PUBLIC: &str = include_str!("../testdata/active.pub.pem");
const ROTATED_PRIVATE: &str = include_str!("../testdata/rotated.pem");
const ROTATED_PUBLIC: &str = include_str!("../testdata/rotated.pub.pem");

pub fn private_pem(kid: &str) -> &'static str {
    match kid {
        ACTIVE_KID => ACTIVE_PRIVATE,
        ROTATED_KID => ROTATED_PRIVATE,
        other => panic!("no fixture key {other:?}"),
    }
}

pub fn public_pem(kid: &str) -> &'static str {
    match kid {
        ACTIVE_KID => ACTIVE_PUBLIC,
        ROTATED_KID => ROTATED_PUBLIC,
        other => panic!("no fixture key {other:?}"),
    }
}

pub fn key_pair(kid: &str) -> SigningKeyPair {
    SigningKeyPair::from_pem(kid, private_pem(kid).as_bytes(), public_pem(kid).as_bytes())
        .expect("fixture key pair parses")
}

/// Store holding both fixture pairs.
pub fn keystore() -> Arc<KeyStore> {
    Arc::new(KeyStore::from_pairs([
        (ACTIVE_KID, key_pair(ACTIVE_KID)),
        (ROTATED_KID, key_pair(ROTATED_KID)),
    ]))
}

/// RS256 authority over [`keystore`] signing with [`ACTIVE_KID`].
pub fn authority() -> TokenAuthority {
    TokenAuthority::new(keystore(), ACTIVE_KID).expect("fixture authority")
}

/// One-hour claims for a random subject, starting at `now`.
pub fn claims_at(roles: &[Role], now: DateTime<Utc>) -> Claims {
    Claims::new(
        Uuid::new_v4().to_string(),
        roles.iter().copied(),
        TEST_ISSUER,
        TimeDelta::hours(1),
        now,
    )
}

/// A valid token for a random subject holding `roles`.
pub fn token(roles: &[Role]) -> String {
    authority()
        .issue(&claims_at(roles, Utc::now()))
        .expect("fixture token")
}

/// Signs `claims` with the private key of `signing_kid` while the header
/// names `header_kid`, which need not match.
pub fn forge(claims: &Claims, header_kid: Option<&str>, signing_kid: &str) -> String {
    forge_value(claims, header_kid, signing_kid)
}

/// Like [`forge`] for an arbitrary payload.
pub fn forge_value<T: Serialize>(payload: &T, header_kid: Option<&str>, signing_kid: &str) -> String {
    let header = Header {
        kid: header_kid.map(str::to_string),
        ..Header::new(Algorithm::RS256)
    };
    let key = EncodingKey::from_rsa_pem(private_pem(signing_kid).as_bytes())
        .expect("fixture private key");

    encode(&header, payload, &key).expect("encode forged token")
}
