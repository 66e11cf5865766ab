//! Database configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the database lives and how connections behave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database file. `:memory:` opens a private in-memory database.
    pub path: PathBuf,

    /// How long a connection waits on a locked database before failing.
    pub busy_timeout_ms: u64,

    /// Use write-ahead logging so readers do not block the writer.
    pub wal: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bookshelf.db"),
            busy_timeout_ms: 5000,
            wal: true,
        }
    }
}

impl DbConfig {
    /// Default settings for a database at `path`.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Settings for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            wal: false,
            ..Self::default()
        }
    }

    /// Whether this points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }

    /// Busy timeout as a `Duration`.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.path, PathBuf::from("bookshelf.db"));
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert!(config.wal);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory() {
        let config = DbConfig::in_memory();
        assert!(config.is_in_memory());
        assert!(!config.wal);
    }

    #[test]
    fn test_at_keeps_other_defaults() {
        let config = DbConfig::at("/tmp/shop.db");
        assert_eq!(config.path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.busy_timeout_ms, 5000);
    }
}
