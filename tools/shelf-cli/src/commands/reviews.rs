//! Review commands.

use anyhow::Result;
use shelf_commerce::review::ReviewSummary;
use shelf_db::{CatalogStore, ReviewStore};

use super::{ReviewArgs, ReviewCommand};
use crate::context::Context;
use crate::output::{truncate, Output};

/// Run the review command.
pub fn run(args: ReviewArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let reviews = ReviewStore::new(&db);

    match args.command {
        ReviewCommand::Add { book, content } => {
            let user = ctx.current_user(&db)?;
            let review = reviews.add_review(&user, book, &content)?;
            if ctx.output.is_json() {
                ctx.output.json(&review);
            } else {
                ctx.output
                    .success(&format!("Review {} posted on book {}", review.id, book));
            }
        }
        ReviewCommand::List { book } => {
            let list = reviews.list_reviews(book)?;
            if ctx.output.is_json() {
                ctx.output.json(&list);
                return Ok(());
            }
            let title = CatalogStore::new(&db).get_book(book)?.title;
            ctx.output.header(&format!("Reviews of {}", title));
            if list.is_empty() {
                ctx.output.info("No reviews yet.");
            }
            for review in &list {
                ctx.output.list_item(&format!(
                    "{} on {}: {}",
                    review.username,
                    review.created_at.format("%Y-%m-%d %H:%M"),
                    review.content
                ));
            }
        }
        ReviewCommand::Recent { limit } => {
            let recent = reviews.recent_reviews(limit)?;
            if ctx.output.is_json() {
                ctx.output.json(&recent);
            } else {
                ctx.output.header("Recent reviews");
                print_summaries(&recent, &ctx.output);
            }
        }
    }
    Ok(())
}

/// Print cross-book review summaries, one per line.
pub(crate) fn print_summaries(summaries: &[ReviewSummary], output: &Output) {
    if summaries.is_empty() {
        output.info("No reviews yet.");
        return;
    }
    for summary in summaries {
        output.list_item(&format!(
            "{} on {}: {}",
            summary.review.username,
            summary.book_title,
            truncate(&summary.review.content, 60)
        ));
    }
}
