//! User directory.
//!
//! Stand-in for the external identity provider: it records which usernames
//! exist and whether they are staff, and resolves a username into a
//! [`User`]. Credentials are not stored.

use crate::db::{now, timestamp_to_sql, Db};
use crate::error::{is_unique_violation, Result, StoreError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use shelf_auth::{Role, User};
use shelf_commerce::UserId;
use tracing::{debug, info};

/// Longest username accepted.
pub const MAX_USERNAME_LEN: usize = 150;

/// Registered users.
#[derive(Debug, Clone, Copy)]
pub struct UserDirectory<'a> {
    db: &'a Db,
}

impl<'a> UserDirectory<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Register a new user.
    ///
    /// Usernames are case-sensitive, at most 150 characters, and made of
    /// letters, digits and `@.+-_`.
    pub fn create_user(&self, username: &str, role: Role) -> Result<User> {
        validate_username(username)?;

        let id = self.db.write(|tx| {
            tx.execute(
                "INSERT INTO users (username, is_staff, created_at) VALUES (?1, ?2, ?3)",
                params![username, role == Role::Staff, timestamp_to_sql(&now())],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Validation(format!("username already taken: {}", username))
                } else {
                    StoreError::Database(e)
                }
            })?;
            Ok(UserId::new(tx.last_insert_rowid()))
        })?;

        info!(user_id = %id, username, role = role.as_str(), "user created");
        Ok(User::authenticated(id, username, role))
    }

    /// Look a user up by exact username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.db.read(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, username, is_staff FROM users WHERE username = ?1",
                    [username],
                    user_from_row,
                )
                .optional()?)
        })
    }

    /// Look a user up by ID.
    pub fn get(&self, id: UserId) -> Result<Option<User>> {
        self.db.read(|conn| find_by_id(conn, id))
    }

    /// Resolve the identity a request acts as.
    ///
    /// No username means an anonymous caller. A username that is not
    /// registered fails with `NotAuthenticated`.
    pub fn resolve(&self, username: Option<&str>) -> Result<User> {
        match username {
            None => Ok(User::anonymous()),
            Some(name) => {
                let user = self.find_by_username(name)?;
                debug!(username = name, found = user.is_some(), "resolving user");
                user.ok_or(StoreError::NotAuthenticated)
            }
        }
    }

    /// All users, in registration order.
    pub fn list(&self) -> Result<Vec<User>> {
        self.db.read(|conn| {
            let mut stmt = conn.prepare("SELECT id, username, is_staff FROM users ORDER BY id")?;
            let users = stmt
                .query_map([], user_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
    }

    /// Delete a user together with their cart and reviews.
    pub fn delete_user(&self, id: UserId) -> Result<()> {
        let removed = self
            .db
            .write(|tx| Ok(tx.execute("DELETE FROM users WHERE id = ?1", [id.get()])?))?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

pub(crate) fn find_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            "SELECT id, username, is_staff FROM users WHERE id = ?1",
            [id.get()],
            user_from_row,
        )
        .optional()?)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role = if row.get::<_, bool>(2)? {
        Role::Staff
    } else {
        Role::Customer
    };
    Ok(User::authenticated(
        UserId::new(row.get(0)?),
        row.get::<_, String>(1)?,
        role,
    ))
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(StoreError::Validation("username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(StoreError::Validation(format!(
            "username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if let Some(c) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || "@.+-_".contains(*c)))
    {
        return Err(StoreError::Validation(format!(
            "username contains invalid character {:?}",
            c
        )));
    }
    Ok(())
}
