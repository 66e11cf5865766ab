//! User registration commands.

use anyhow::{anyhow, Result};
use shelf_auth::{Role, User};
use shelf_db::UserDirectory;

use super::{UserArgs, UserCommand};
use crate::context::Context;

/// Run the user command.
pub fn run(args: UserArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let users = UserDirectory::new(&db);

    match args.command {
        UserCommand::Add { username, staff } => {
            let role = if staff { Role::Staff } else { Role::Customer };
            let user = users.create_user(&username, role)?;
            if ctx.output.is_json() {
                ctx.output.json(&user);
            } else {
                ctx.output
                    .success(&format!("Registered {} '{}'", role.as_str(), username));
            }
        }
        UserCommand::Remove { username } => {
            let id = users
                .find_by_username(&username)?
                .and_then(|u| u.user_id())
                .ok_or_else(|| anyhow!("Unknown user '{}'", username))?;
            users.delete_user(id)?;
            ctx.output.removed(
                "user",
                &username,
                &format!("Removed '{}' with their cart and reviews", username),
            );
        }
        UserCommand::List => list_users(&users.list()?, ctx),
    }
    Ok(())
}

fn list_users(users: &[User], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&users);
        return;
    }
    if users.is_empty() {
        ctx.output.info("No users registered.");
        return;
    }

    let widths = [6, 24, 10];
    ctx.output.table_header(&["ID", "USERNAME", "ROLE"], &widths);
    for user in users {
        let id = user.user_id().map(|id| id.to_string()).unwrap_or_default();
        let role = user.role().map(|r| r.as_str()).unwrap_or("-");
        ctx.output
            .table_row(&[&id, user.display_name(), role], &widths);
    }
}
