//! Schema migrations.
//!
//! The applied version is kept in `PRAGMA user_version`. Each entry in
//! `MIGRATIONS` moves the schema forward by one version and is applied
//! inside the same immediate transaction that bumps the counter, so two
//! processes opening a fresh file at once cannot both run it.

use crate::error::Result;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

const V1_INITIAL: &str = "
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT    NOT NULL UNIQUE,
    is_staff    INTEGER NOT NULL DEFAULT 0,
    created_at  INTEGER NOT NULL
);

CREATE TABLE books (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT    NOT NULL,
    author       TEXT    NOT NULL,
    description  TEXT    NOT NULL DEFAULT '',
    price_cents  INTEGER NOT NULL CHECK (price_cents >= 0),
    cover_image  TEXT,
    release_date TEXT,
    is_popular   INTEGER NOT NULL DEFAULT 0,
    is_upcoming  INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX books_popular ON books (is_popular, id);

CREATE TABLE upcoming_books (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    author       TEXT NOT NULL,
    release_date TEXT NOT NULL,
    cover_image  TEXT,
    description  TEXT NOT NULL DEFAULT ''
);

CREATE TABLE reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id     INTEGER NOT NULL REFERENCES books (id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    content     TEXT    NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE INDEX reviews_book_created ON reviews (book_id, created_at DESC, id DESC);
CREATE INDEX reviews_created ON reviews (created_at DESC, id DESC);
CREATE INDEX reviews_user ON reviews (user_id);

CREATE TABLE carts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
    created_at  INTEGER NOT NULL
);

CREATE TABLE cart_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    cart_id     INTEGER NOT NULL REFERENCES carts (id) ON DELETE CASCADE,
    book_id     INTEGER NOT NULL REFERENCES books (id) ON DELETE CASCADE,
    quantity    INTEGER NOT NULL CHECK (quantity BETWEEN 1 AND 9999),
    UNIQUE (cart_id, book_id)
);

CREATE INDEX cart_items_book ON cart_items (book_id);
";

/// Ordered schema migrations; index `n` upgrades version `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[V1_INITIAL];

/// Latest schema version.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

/// Bring the schema up to `SCHEMA_VERSION`.
pub(crate) fn migrate(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current: i64 = tx.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current >= SCHEMA_VERSION {
        debug!(version = current, "schema up to date");
        return Ok(());
    }

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        debug!(version = index + 1, "applying migration");
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!(from = current, to = SCHEMA_VERSION, "schema migrated");
    Ok(())
}

/// Read the schema version recorded in the database.
pub(crate) fn version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(version(&conn).unwrap(), SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('users', 'books', 'upcoming_books', 'reviews', 'carts', 'cart_items')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_quantity_check_constraint() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute_batch(
            "INSERT INTO users (username, created_at) VALUES ('bilbo', 0);
             INSERT INTO books (title, author, price_cents) VALUES ('Dune', 'Frank Herbert', 999);
             INSERT INTO carts (user_id, created_at) VALUES (1, 0);",
        )
        .unwrap();

        let zero = conn.execute(
            "INSERT INTO cart_items (cart_id, book_id, quantity) VALUES (1, 1, 0)",
            [],
        );
        assert!(zero.is_err());
    }
}
