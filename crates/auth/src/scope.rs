use assetforge_core::UserId;

use crate::{AuthError, ClaimSet, Role};

/// Authorization outcome deciding how far a data query may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// The caller may read/write any record regardless of `created_by`.
    All,
    /// Queries must be restricted to records owned by this subject.
    OwnedOnly(UserId),
}

impl VisibilityScope {
    /// Whether a record owned by `created_by` is visible under this scope.
    pub fn permits(&self, created_by: UserId) -> bool {
        match self {
            VisibilityScope::All => true,
            VisibilityScope::OwnedOnly(owner) => *owner == created_by,
        }
    }
}

/// Decide the visibility scope for a request.
///
/// Exhaustive over [`Role`]: adding a role forces a decision here.
pub fn scope_query(claims: &ClaimSet) -> VisibilityScope {
    match claims.role {
        Role::Admin => VisibilityScope::All,
        Role::User => VisibilityScope::OwnedOnly(claims.subject_id),
    }
}

/// Role-only gate: no resource data is consulted.
pub fn require_role(claims: &ClaimSet, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&claims.role) {
        return Ok(());
    }

    let message = if allowed.contains(&Role::User) {
        "Access denied."
    } else {
        "Access denied. Admins only."
    };
    Err(AuthError::Forbidden(message.to_string()))
}

/// Ownership gate for a direct record fetch.
///
/// A record that exists but belongs to someone else is `Forbidden`, never a
/// not-found result: "exists but not yours" and "does not exist" are distinct
/// outcomes.
pub fn authorize_record(claims: &ClaimSet, created_by: UserId) -> Result<(), AuthError> {
    match scope_query(claims) {
        VisibilityScope::All => Ok(()),
        VisibilityScope::OwnedOnly(owner) if owner == created_by => Ok(()),
        VisibilityScope::OwnedOnly(_) => Err(AuthError::Forbidden("Access denied.".to_string())),
    }
}
