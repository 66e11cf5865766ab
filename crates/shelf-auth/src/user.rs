//! User types.
//!
//! A `User` is the identity a caller acts as. It is resolved once per request
//! by the identity provider and then passed explicitly to every store
//! operation; nothing in the stores reads an ambient "current user".

use crate::AuthError;
use serde::{Deserialize, Serialize};
use shelf_commerce::ids::UserId;
use std::str::FromStr;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store staff: may edit the catalog.
    Staff,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Get permission level (higher = more permissions).
    pub fn level(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Staff => 1,
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "staff" => Ok(Role::Staff),
            _ => Err(()),
        }
    }
}

/// The identity a request acts as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum User {
    /// No identity was resolved.
    #[default]
    Anonymous,
    /// Resolved user.
    Authenticated {
        /// User ID.
        id: UserId,
        /// Login name.
        username: String,
        /// Permission level.
        role: Role,
    },
}

impl User {
    /// Create an anonymous user.
    pub fn anonymous() -> Self {
        User::Anonymous
    }

    /// Create an authenticated user.
    pub fn authenticated(id: UserId, username: impl Into<String>, role: Role) -> Self {
        User::Authenticated {
            id,
            username: username.into(),
            role,
        }
    }

    /// Check if user is authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, User::Authenticated { .. })
    }

    /// Get user ID if authenticated.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            User::Authenticated { id, .. } => Some(*id),
            User::Anonymous => None,
        }
    }

    /// Get the user ID or fail with `NotAuthenticated`.
    pub fn require_id(&self) -> Result<UserId, AuthError> {
        self.user_id().ok_or(AuthError::NotAuthenticated)
    }

    /// Get the user ID if the user holds at least `required`.
    ///
    /// Anonymous users get `NotAuthenticated`; authenticated users without
    /// the role get `InsufficientPermissions`.
    pub fn require_role(&self, required: Role) -> Result<UserId, AuthError> {
        match self {
            User::Anonymous => Err(AuthError::NotAuthenticated),
            User::Authenticated { id, role, .. } if role.has_permission(required) => Ok(*id),
            User::Authenticated { .. } => Err(AuthError::InsufficientPermissions),
        }
    }

    /// Get display name.
    pub fn display_name(&self) -> &str {
        match self {
            User::Authenticated { username, .. } => username,
            User::Anonymous => "anonymous",
        }
    }

    /// Get the role; anonymous users have none.
    pub fn role(&self) -> Option<Role> {
        match self {
            User::Authenticated { role, .. } => Some(*role),
            User::Anonymous => None,
        }
    }
}
