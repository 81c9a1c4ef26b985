use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use assetforge_core::UserId;

use crate::Role;

/// Decoded, trusted identity for one request (transport-agnostic).
///
/// A `ClaimSet` is constructed fresh per request from the bearer credential,
/// never mutated, and discarded when the request completes. No server-side
/// session state exists behind it.
///
/// On the wire `issued_at`/`expires_at` travel as the standard numeric
/// `iat`/`exp` claims so tokens interoperate with any JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject / principal identifier. Immutable once issued.
    #[serde(rename = "sub")]
    pub subject_id: UserId,

    /// Principal email, informational.
    pub email: String,

    /// Role driving every authorization outcome.
    pub role: Role,

    /// Display only. Never consulted for access control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("empty subject")]
    EmptySubject,
}

/// Deterministically validate claims against a supplied clock instant.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::token`]. A token whose expiry equals `now` is expired.
pub fn validate_claims(claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.subject_id.as_uuid().is_nil() {
        return Err(TokenValidationError::EmptySubject);
    }
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> ClaimSet {
        ClaimSet {
            subject_id: UserId::new(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            department: None,
            full_name: None,
            issued_at,
            expires_at,
        }
    }

    #[test]
    fn valid_inside_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(5), now + Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn expired_exactly_at_expiry() {
        let now = Utc::now();
        let c = claims(now - Duration::hours(1), now);
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn not_yet_valid_before_issuance() {
        let now = Utc::now();
        let c = claims(now + Duration::minutes(1), now + Duration::hours(1));
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, now - Duration::seconds(1));
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn rejects_nil_subject() {
        let now = Utc::now();
        let mut c = claims(now - Duration::minutes(1), now + Duration::minutes(1));
        c.subject_id = UserId::from_uuid(uuid::Uuid::nil());
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::EmptySubject)
        );
    }

    #[test]
    fn wire_format_uses_numeric_iat_exp() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(1));
        let value = serde_json::to_value(&c).unwrap();
        assert!(value["iat"].is_i64());
        assert!(value["exp"].is_i64());
        assert_eq!(value["sub"].as_str().unwrap(), c.subject_id.to_string());
        assert!(value.get("department").is_none());
    }
}
