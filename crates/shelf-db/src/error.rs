//! Store error types.

use shelf_auth::AuthError;
use shelf_commerce::CommerceError;
use thiserror::Error;

/// Errors returned by the stores.
///
/// `NotFound`, `Forbidden`, `NotAuthenticated` and `Validation` are raised
/// by the stores themselves. Anything SQLite reports passes through
/// unchanged as `Database`; the stores never retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced record does not exist, or is not visible to the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is known but may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Operation requires a resolved user.
    #[error("authentication required")]
    NotAuthenticated,

    /// Malformed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid store configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reported by SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

impl From<CommerceError> for StoreError {
    fn from(e: CommerceError) -> Self {
        StoreError::Validation(e.to_string())
    }
}

impl From<AuthError> for StoreError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotAuthenticated => StoreError::NotAuthenticated,
            AuthError::InsufficientPermissions => StoreError::Forbidden(e.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Whether a SQLite error is a violated UNIQUE or PRIMARY KEY constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Whether a SQLite error is a violated FOREIGN KEY constraint.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
