//! Storage error model.

use thiserror::Error;

/// Failure of a store collaborator.
///
/// `Unavailable` and `Decode` are 500-class: the caller surfaces them without
/// distinguishing cause, while the detail is logged server-side.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness or referential rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// The backing store is unreachable or erroring.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be interpreted.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") => {
                    if db.constraint() == Some("users_email_key") {
                        StoreError::Conflict("Email already in use".to_string())
                    } else {
                        StoreError::Conflict("Duplicate value".to_string())
                    }
                }
                Some("23503") => {
                    StoreError::Conflict("Record is still referenced by other records".to_string())
                }
                _ => StoreError::Unavailable(e.to_string()),
            },
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}
