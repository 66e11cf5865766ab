//! Upcoming release commands.

use anyhow::Result;
use shelf_commerce::catalog::{NewUpcomingBook, UpcomingBook};
use shelf_db::CatalogStore;

use super::{UpcomingArgs, UpcomingCommand};
use crate::context::Context;
use crate::output::Output;

const UPCOMING_WIDTHS: [usize; 4] = [6, 36, 24, 12];

/// Run the upcoming command.
pub fn run(args: UpcomingArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let catalog = CatalogStore::new(&db);

    match args.command.unwrap_or(UpcomingCommand::List { limit: None }) {
        UpcomingCommand::Add {
            title,
            author,
            release,
            description,
            cover,
        } => {
            let user = ctx.current_user(&db)?;
            let mut book = NewUpcomingBook::new(title, author, release).with_description(description);
            book.cover_image = cover;

            let book = catalog.add_upcoming(&user, book)?;
            if ctx.output.is_json() {
                ctx.output.json(&book);
            } else {
                ctx.output.success(&format!(
                    "Announced {} for {} (id {})",
                    book.title, book.release_date, book.id
                ));
            }
        }
        UpcomingCommand::List { limit } => {
            let books = match limit {
                Some(limit) => catalog.list_upcoming(limit)?,
                None => catalog.all_upcoming()?,
            };
            if ctx.output.is_json() {
                ctx.output.json(&books);
            } else {
                ctx.output.header("Upcoming releases");
                print_upcoming(&books, &ctx.output);
            }
        }
        UpcomingCommand::Show { id } => {
            let book = catalog.get_upcoming(id)?;
            if ctx.output.is_json() {
                ctx.output.json(&book);
                return Ok(());
            }
            ctx.output.header(&format!("{} by {}", book.title, book.author));
            ctx.output.kv("id", &book.id.to_string());
            ctx.output.kv("release date", &book.release_date.to_string());
            if let Some(cover) = &book.cover_image {
                ctx.output.kv("cover", cover);
            }
            if !book.description.is_empty() {
                ctx.output.info("");
                ctx.output.info(&book.description);
            }
        }
    }
    Ok(())
}

/// Print upcoming releases as a table.
pub(crate) fn print_upcoming(books: &[UpcomingBook], output: &Output) {
    if books.is_empty() {
        output.info("No upcoming releases.");
        return;
    }
    output.table_header(&["ID", "TITLE", "AUTHOR", "RELEASE"], &UPCOMING_WIDTHS);
    for book in books {
        output.table_row(
            &[
                &book.id.to_string(),
                &book.title,
                &book.author,
                &book.release_date.to_string(),
            ],
            &UPCOMING_WIDTHS,
        );
    }
}
