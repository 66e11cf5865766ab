//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The operation needs a resolved user and none was supplied.
    #[error("authentication required")]
    NotAuthenticated,

    /// The user is known but lacks the required role.
    #[error("insufficient permissions")]
    InsufficientPermissions,
}
