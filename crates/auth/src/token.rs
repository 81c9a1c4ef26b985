use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::{AuthError, ClaimSet, validate_claims};

/// Verification seam for bearer tokens.
///
/// Verification is self-contained: no round trip to the issuing service, which
/// is why the token format carries role/subject/expiry inline. Implementations
/// are pure functions of the token, the configured key, and `now`; no retry
/// semantics apply.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, AuthError>;
}

#[derive(Debug, Error)]
#[error("failed to sign token")]
pub struct SignError(#[from] jsonwebtoken::errors::Error);

/// HS256 codec over a shared symmetric secret.
///
/// The same key both signs tokens at login and verifies them at the gate; it
/// is constructed once at startup and shared immutably.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign a claim set into a compact token.
    pub fn sign(&self, claims: &ClaimSet) -> Result<String, SignError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }
}

impl TokenVerifier for Hs256TokenCodec {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, AuthError> {
        // Signature/format check only; the validity window is enforced by
        // `validate_claims` against the caller-supplied clock, so expiry
        // behaves deterministically (no leeway).
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        let data = decode::<ClaimSet>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "token verification failed");
            AuthError::InvalidCredential
        })?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(error = %e, "token claims rejected");
            AuthError::InvalidCredential
        })?;

        Ok(data.claims)
    }
}

/// Authenticate one request from its raw `Authorization` header value.
///
/// Absence or anything not shaped `Bearer <token>` is `MissingCredential`;
/// verification failures are `InvalidCredential`. The distinction never
/// reveals more than that to the caller.
pub fn authenticate(
    raw_header: Option<&str>,
    verifier: &dyn TokenVerifier,
    now: DateTime<Utc>,
) -> Result<ClaimSet, AuthError> {
    let token = extract_bearer(raw_header)?;
    verifier.verify(token, now)
}

fn extract_bearer(raw_header: Option<&str>) -> Result<&str, AuthError> {
    let header = raw_header.ok_or(AuthError::MissingCredential)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredential)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use assetforge_core::UserId;

    use super::*;
    use crate::Role;

    fn codec() -> Hs256TokenCodec {
        Hs256TokenCodec::new(b"test-secret")
    }

    fn claims(now: DateTime<Utc>, ttl: Duration) -> ClaimSet {
        ClaimSet {
            subject_id: UserId::new(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            department: Some("IT".to_string()),
            full_name: Some("Alice Smith".to_string()),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    #[test]
    fn round_trip_preserves_claims() {
        let now = Utc::now();
        let issued = claims(now, Duration::hours(1));
        let token = codec().sign(&issued).unwrap();

        let decoded = codec().verify(&token, now).unwrap();
        // Timestamps survive at second precision only (numeric iat/exp).
        assert_eq!(decoded.subject_id, issued.subject_id);
        assert_eq!(decoded.email, issued.email);
        assert_eq!(decoded.role, issued.role);
        assert_eq!(decoded.department, issued.department);
        assert_eq!(decoded.full_name, issued.full_name);
        assert_eq!(decoded.issued_at.timestamp(), issued.issued_at.timestamp());
        assert_eq!(
            decoded.expires_at.timestamp(),
            issued.expires_at.timestamp()
        );
    }

    #[test]
    fn rejects_token_signed_with_other_key() {
        let now = Utc::now();
        let token = Hs256TokenCodec::new(b"other-secret")
            .sign(&claims(now, Duration::hours(1)))
            .unwrap();

        assert_eq!(
            codec().verify(&token, now),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let token = codec().sign(&claims(now - Duration::hours(2), Duration::hours(1))).unwrap();

        assert_eq!(
            codec().verify(&token, now),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn rejects_garbage_token() {
        assert_eq!(
            codec().verify("not.a.token", Utc::now()),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn missing_or_malformed_header_is_missing_credential() {
        let codec = codec();
        let now = Utc::now();

        for header in [None, Some(""), Some("Bearer"), Some("Bearer "), Some("Token abc")] {
            assert_eq!(
                authenticate(header, &codec, now),
                Err(AuthError::MissingCredential),
                "{header:?} should be MissingCredential"
            );
        }
    }

    #[test]
    fn authenticate_accepts_well_formed_header() {
        let c = codec();
        let now = Utc::now();
        let issued = claims(now, Duration::hours(1));
        let token = c.sign(&issued).unwrap();
        let header = format!("Bearer {token}");

        let decoded = authenticate(Some(&header), &c, now).unwrap();
        assert_eq!(decoded.subject_id, issued.subject_id);
    }
}
