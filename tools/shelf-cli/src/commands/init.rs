//! Initialize a bookstore in the current directory.

use anyhow::{bail, Result};
use shelf_auth::Role;
use shelf_db::{Db, UserDirectory, SCHEMA_VERSION};

use super::InitArgs;
use crate::config::{CliConfig, CONFIG_FILE};
use crate::context::Context;

/// Run the init command.
pub fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite it",
            config_path.display()
        );
    }

    ctx.output.header("Initializing bookstore");

    let config = CliConfig::with_database(&args.database);
    std::fs::write(&config_path, config.to_toml()?)?;
    ctx.output.success(&format!("Wrote {}", config_path.display()));

    let mut db_config = config.database;
    db_config.path = ctx.resolve_path(&db_config.path);
    let db = Db::open(&db_config)?;
    ctx.output.success(&format!(
        "Database ready at {} (schema v{})",
        db_config.path.display(),
        SCHEMA_VERSION
    ));

    if let Some(name) = args.staff.as_deref() {
        create_staff(&db, name, ctx)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "config": config_path,
            "database": db_config.path,
            "schema_version": db.schema_version()?,
        }));
        return Ok(());
    }

    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.list_item("shelf --user <staff> book add <title> <author> --price 9.99");
    ctx.output.list_item("shelf user add <name>");
    ctx.output.list_item("shelf --user <name> cart add <book-id>");

    Ok(())
}

fn create_staff(db: &Db, name: &str, ctx: &Context) -> Result<()> {
    let users = UserDirectory::new(db);
    if users.find_by_username(name)?.is_some() {
        ctx.output.warn(&format!("User '{}' already exists, skipping", name));
        return Ok(());
    }
    users.create_user(name, Role::Staff)?;
    ctx.output.success(&format!("Registered staff user '{}'", name));
    Ok(())
}
