use assetforge_auth::{ClaimSet, Role};
use assetforge_core::UserId;

/// Principal context for a request (authenticated identity + role).
///
/// Built once by the auth middleware from the verified token and passed to
/// handlers as an explicit, immutable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    claims: ClaimSet,
}

impl PrincipalContext {
    pub fn new(claims: ClaimSet) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    pub fn subject_id(&self) -> UserId {
        self.claims.subject_id
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }
}
