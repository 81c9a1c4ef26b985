//! `assetforge-auth` — pure authentication/authorization boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage. It covers the
//! full gate every protected request passes through: bearer extraction, HS256
//! token verification, claim validation, role checks, and the role-scoped
//! data-visibility rule.

pub mod claims;
pub mod error;
pub mod policy;
pub mod roles;
pub mod scope;
pub mod token;

pub use claims::{ClaimSet, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use policy::{ProtectedAction, allowed_roles, require};
pub use roles::Role;
pub use scope::{VisibilityScope, authorize_record, require_role, scope_query};
pub use token::{Hs256TokenCodec, SignError, TokenVerifier, authenticate};
