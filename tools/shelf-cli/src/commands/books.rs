//! Catalog commands: book administration, search and the popular list.

use anyhow::Result;
use shelf_commerce::catalog::{Book, BookDetail, NewBook};
use shelf_db::CatalogStore;

use super::{BookArgs, BookCommand, PopularArgs, SearchArgs};
use crate::context::Context;
use crate::output::{flag_badge, Output};

const BOOK_WIDTHS: [usize; 4] = [6, 36, 24, 10];

/// Run the book command.
pub fn run(args: BookArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let user = ctx.current_user(&db)?;
    let catalog = CatalogStore::new(&db);

    match args.command {
        BookCommand::Add {
            title,
            author,
            price,
            description,
            cover,
            released,
            popular,
            upcoming,
        } => {
            let mut book = NewBook::new(title, author, price).with_description(description);
            book.cover_image = cover;
            book.release_date = released;
            book.is_popular = popular;
            book.is_upcoming = upcoming;

            let book = catalog.add_book(&user, book)?;
            report(&book, &format!("Added book {}", book.id), ctx);
        }
        BookCommand::Show { id } => show_detail(&catalog.book_detail(id)?, ctx),
        BookCommand::Price { id, price } => {
            let book = catalog.update_price(&user, id, price)?;
            report(&book, &format!("{} now costs {}", book.title, book.price.display()), ctx);
        }
        BookCommand::Flags {
            id,
            popular,
            upcoming,
        } => {
            let book = catalog.set_flags(&user, id, popular, upcoming)?;
            report(&book, &format!("Updated flags for {}", book.title), ctx);
        }
        BookCommand::Remove { id } => {
            catalog.delete_book(&user, id)?;
            ctx.output.removed("book", id, &format!("Removed book {}", id));
        }
    }
    Ok(())
}

/// Run the search command.
pub fn search(args: SearchArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let query = args.query.join(" ");
    let books = CatalogStore::new(&db).search(Some(&query))?;

    if ctx.output.is_json() {
        ctx.output.json(&books);
        return Ok(());
    }

    if query.trim().is_empty() {
        ctx.output.header("All books");
    } else {
        ctx.output.header(&format!("Books matching \"{}\"", query.trim()));
    }
    print_books(&books, &ctx.output);
    Ok(())
}

/// Run the popular command.
pub fn popular(args: PopularArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let limit = args.limit.unwrap_or(ctx.config.feed.popular);
    let books = CatalogStore::new(&db).list_popular(limit)?;

    if ctx.output.is_json() {
        ctx.output.json(&books);
        return Ok(());
    }
    ctx.output.header("Popular books");
    print_books(&books, &ctx.output);
    Ok(())
}

/// Print books as a table.
pub(crate) fn print_books(books: &[Book], output: &Output) {
    if books.is_empty() {
        output.info("No books found.");
        return;
    }
    output.table_header(&["ID", "TITLE", "AUTHOR", "PRICE"], &BOOK_WIDTHS);
    for book in books {
        output.table_row(
            &[
                &book.id.to_string(),
                &book.title,
                &book.author,
                &book.price.display(),
            ],
            &BOOK_WIDTHS,
        );
    }
}

fn report(book: &Book, msg: &str, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(book);
    } else {
        ctx.output.success(msg);
    }
}

fn show_detail(detail: &BookDetail, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(detail);
        return;
    }

    let book = &detail.book;
    ctx.output.header(&book.label());
    ctx.output.kv("id", &book.id.to_string());
    ctx.output.kv("price", &book.price.display());
    if let Some(date) = book.release_date {
        ctx.output.kv("released", &date.to_string());
    }
    if let Some(cover) = &book.cover_image {
        ctx.output.kv("cover", cover);
    }
    ctx.output.kv("popular", &flag_badge(book.is_popular));
    ctx.output.kv("upcoming", &flag_badge(book.is_upcoming));
    if !book.description.is_empty() {
        ctx.output.info("");
        ctx.output.info(&book.description);
    }

    ctx.output.header(&format!("Reviews ({})", detail.reviews.len()));
    if detail.reviews.is_empty() {
        ctx.output.info("No reviews yet.");
    }
    for review in &detail.reviews {
        ctx.output.list_item(&format!(
            "{} on {}: {}",
            review.username,
            review.created_at.format("%Y-%m-%d %H:%M"),
            review.content
        ));
    }
}
