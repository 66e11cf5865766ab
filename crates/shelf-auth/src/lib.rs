//! Identity types for the bookstore.
//!
//! Login, signup and credential storage belong to an external provider. This
//! crate only describes what that provider hands back: who the caller is and
//! what role they hold.

mod error;
mod user;

pub use error::AuthError;
pub use user::{Role, User};
