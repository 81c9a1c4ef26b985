//! Password hashing for the identity collaborator.

use crate::StoreError;

/// Hash a plaintext password with bcrypt at the default cost.
pub fn hash_password(plain: &str) -> Result<String, StoreError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| StoreError::Unavailable(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Any verification failure (including a corrupt hash) reads as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn corrupt_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
