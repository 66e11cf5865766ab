//! Home page feed.

use anyhow::Result;
use shelf_db::CatalogStore;

use super::books::print_books;
use super::reviews::print_summaries;
use super::upcoming::print_upcoming;
use crate::context::Context;

/// Run the home command.
pub fn run(ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let feed = CatalogStore::new(&db).home_feed(ctx.config.feed)?;

    if ctx.output.is_json() {
        ctx.output.json(&feed);
        return Ok(());
    }

    ctx.output.header("Coming soon");
    print_upcoming(&feed.upcoming, &ctx.output);
    ctx.output.header("Popular");
    print_books(&feed.popular, &ctx.output);
    ctx.output.header("Latest reviews");
    print_summaries(&feed.recent_reviews, &ctx.output);
    Ok(())
}
