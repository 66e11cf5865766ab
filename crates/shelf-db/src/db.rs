//! Database handle and transaction helpers.

use crate::config::DbConfig;
use crate::error::{Result, StoreError};
use crate::schema;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, Row, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Handle to the bookstore database.
///
/// Wraps one SQLite connection. Calls through the same handle are
/// serialized by the mutex; separate handles (other threads, other
/// processes) on the same file are serialized by SQLite itself, because
/// every multi-statement write runs in an immediate transaction that takes
/// the write lock before its first read.
///
/// # Example
///
/// ```rust
/// use shelf_db::Db;
///
/// let db = Db::open_in_memory()?;
/// assert_eq!(db.schema_version()?, shelf_db::SCHEMA_VERSION);
/// # Ok::<(), shelf_db::StoreError>(())
/// ```
pub struct Db {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Db {
    /// Open (creating if needed) the database described by `config` and
    /// bring its schema up to date.
    pub fn open(config: &DbConfig) -> Result<Self> {
        if config.is_in_memory() {
            return Self::open_in_memory();
        }

        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(StoreError::Config(format!(
                    "database directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        configure(&conn, config)?;

        let db = Self::from_connection(conn, Some(config.path.clone()))?;
        debug!(path = %config.path.display(), "database opened");
        Ok(db)
    }

    /// Open a file database with default settings.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(&DbConfig::at(path))
    }

    /// Open a private in-memory database. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn, &DbConfig::in_memory())?;
        Self::from_connection(conn, None)
    }

    fn from_connection(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// File backing this database; `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i64> {
        self.read(schema::version)
    }

    /// Run read-only work on the connection.
    ///
    /// Each statement sees a consistent snapshot; use [`Db::write`] when
    /// several statements must agree with each other.
    pub fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Run `f` inside an immediate transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`, leaving no partial writes behind.
    pub fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").field("path", &self.path).finish()
    }
}

fn configure(conn: &Connection, config: &DbConfig) -> Result<()> {
    conn.busy_timeout(config.busy_timeout())?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    if config.wal {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        if !mode.eq_ignore_ascii_case("wal") {
            warn!(mode = %mode, "write-ahead logging unavailable");
        }
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    Ok(())
}

/// Current time as stored in timestamp columns.
pub(crate) fn now() -> DateTime<Utc> {
    // Storage keeps microseconds; truncate so values read back compare equal.
    let micros = Utc::now().timestamp_micros();
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}

/// Encode a timestamp for an INTEGER column.
pub(crate) fn timestamp_to_sql(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

/// Decode an INTEGER timestamp column.
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let micros: i64 = row.get(idx)?;
    DateTime::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}

/// Convert a caller-supplied row limit for a `LIMIT ?` parameter.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_migrates() {
        let db = Db::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), schema::SCHEMA_VERSION);
        assert!(db.path().is_none());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Db::open_in_memory().unwrap();
        let enabled: i64 = db
            .read(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_write_rolls_back_on_error() {
        let db = Db::open_in_memory().unwrap();
        let result: Result<()> = db.write(|tx| {
            tx.execute(
                "INSERT INTO users (username, created_at) VALUES ('bilbo', 0)",
                [],
            )?;
            Err(StoreError::Validation("abort".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .read(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_file_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let db = Db::open_path(dir.path().join("shop.db")).unwrap();
        let mode: String = db
            .read(|conn| Ok(conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_open_missing_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Db::open_path(dir.path().join("missing").join("shop.db")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_timestamp_precision() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1000, 0);
        assert_eq!(
            DateTime::from_timestamp_micros(timestamp_to_sql(&ts)),
            Some(ts)
        );
    }
}
