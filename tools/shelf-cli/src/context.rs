//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use shelf_auth::User;
use shelf_db::{Db, DbConfig, StoreError, UserDirectory};
use tracing::debug;

use crate::config::{CliConfig, CONFIG_FILE};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
    db_override: Option<PathBuf>,
    username: Option<String>,
}

impl Context {
    /// Load context from the config file and global flags.
    pub fn load(
        config_path: Option<&str>,
        db_override: Option<&Path>,
        username: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd)? {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            output,
            db_override: db_override.map(|p| resolve(&cwd, p)),
            username: username.map(str::to_string),
            cwd,
            config_path,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Result<Option<PathBuf>> {
        let config_names = [CONFIG_FILE, ".shelf.toml", "shelf.json"];

        for dir in start.ancestors() {
            for name in &config_names {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Ok(Some(candidate));
                }
            }
        }
        Ok(None)
    }

    /// Database settings with paths resolved.
    ///
    /// `--db` wins over the config file. A relative path from the config
    /// file is taken relative to that file's directory.
    pub fn db_config(&self) -> DbConfig {
        let mut db = self.config.database.clone();
        if let Some(path) = &self.db_override {
            db.path = path.clone();
        } else if !db.is_in_memory() {
            let base = self
                .config_path
                .as_deref()
                .and_then(Path::parent)
                .unwrap_or(&self.cwd);
            db.path = resolve(base, &db.path);
        }
        db
    }

    /// Open the database, applying any pending migrations.
    pub fn open_db(&self) -> Result<Db> {
        let config = self.db_config();
        debug!(path = %config.path.display(), "opening database");
        Db::open(&config)
            .with_context(|| format!("Failed to open database: {}", config.path.display()))
    }

    /// Resolve the identity given by `--user`.
    pub fn current_user(&self, db: &Db) -> Result<User> {
        UserDirectory::new(db)
            .resolve(self.username.as_deref())
            .map_err(|e| match (e, self.username.as_deref()) {
                (StoreError::NotAuthenticated, Some(name)) => {
                    anyhow!("Unknown user '{}'. Register it with `shelf user add {}`", name, name)
                }
                (e, _) => e.into(),
            })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(dir: &Path, config_path: Option<PathBuf>, db_override: Option<PathBuf>) -> Context {
        Context {
            config: config_path
                .as_deref()
                .map(|p| CliConfig::load(p).unwrap())
                .unwrap_or_default(),
            output: Output::new(true),
            cwd: dir.to_path_buf(),
            config_path,
            db_override,
            username: None,
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        let found = Context::find_config(&nested).unwrap();
        assert_eq!(found, Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    fn test_db_path_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE);
        std::fs::write(&config, "[database]\npath = \"data/shop.db\"\n").unwrap();
        let cwd = dir.path().join("elsewhere");

        let ctx = context(&cwd, Some(config), None);
        assert_eq!(ctx.db_config().path, dir.path().join("data").join("shop.db"));
    }

    #[test]
    fn test_db_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let override_path = dir.path().join("other.db");
        let ctx = context(dir.path(), None, Some(override_path.clone()));
        assert_eq!(ctx.db_config().path, override_path);
    }

    #[test]
    fn test_unknown_user_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path(), None, None);
        let db = Db::open_in_memory().unwrap();

        assert_eq!(ctx.current_user(&db).unwrap(), User::Anonymous);

        ctx.username = Some("saruman".to_string());
        let err = ctx.current_user(&db).unwrap_err();
        assert!(err.to_string().contains("saruman"));
    }
}
