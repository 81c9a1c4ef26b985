use thiserror::Error;

/// Terminal rejection states of the request gate.
///
/// Display strings are the client-facing messages. They are deliberately
/// coarse: verification internals and user existence must never leak through
/// them. Server-side logging carries the detail instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header, or one that does not match `Bearer <token>`.
    #[error("Missing token")]
    MissingCredential,

    /// Signature invalid, payload malformed, or validity window violated.
    #[error("Invalid token")]
    InvalidCredential,

    /// Valid identity with insufficient role, or an ownership mismatch.
    #[error("{0}")]
    Forbidden(String),
}

impl AuthError {
    /// True for failures that map to authentication (401) rather than
    /// authorization (403).
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential)
    }
}
