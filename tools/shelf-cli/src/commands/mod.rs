//! CLI command implementations.

pub mod books;
pub mod cart;
pub mod home;
pub mod init;
pub mod reviews;
pub mod upcoming;
pub mod users;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use shelf_commerce::{BookId, CartItemId, Money, UpcomingBookId};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short, long)]
    pub force: bool,

    /// Register a staff user with this name.
    #[arg(long)]
    pub staff: Option<String>,

    /// Database file to write into the new config.
    #[arg(long, default_value = "bookshelf.db")]
    pub database: PathBuf,
}

/// Arguments for the user command.
#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user.
    Add {
        /// Login name.
        username: String,
        /// Grant catalog editing rights.
        #[arg(long)]
        staff: bool,
    },
    /// Delete a user with their cart and reviews.
    Remove {
        /// Login name.
        username: String,
    },
    /// List registered users.
    List,
}

/// Arguments for the book command.
#[derive(Args)]
pub struct BookArgs {
    #[command(subcommand)]
    pub command: BookCommand,
}

#[derive(Subcommand)]
pub enum BookCommand {
    /// Add a book to the catalog (staff only).
    Add {
        /// Book title.
        title: String,
        /// Author name.
        author: String,
        /// Price, e.g. 9.99.
        #[arg(short, long)]
        price: Money,
        /// Long-form summary.
        #[arg(short, long, default_value = "")]
        description: String,
        /// Cover image path.
        #[arg(long)]
        cover: Option<String>,
        /// Publication date (YYYY-MM-DD).
        #[arg(long)]
        released: Option<NaiveDate>,
        /// Feature the book on the home page.
        #[arg(long)]
        popular: bool,
        /// Mark the book as not yet released.
        #[arg(long)]
        upcoming: bool,
    },
    /// Show a book with its reviews.
    Show {
        /// Book ID.
        id: BookId,
    },
    /// Change a book's price (staff only).
    Price {
        /// Book ID.
        id: BookId,
        /// New price, e.g. 12.00.
        price: Money,
    },
    /// Set the popular and upcoming flags (staff only).
    Flags {
        /// Book ID.
        id: BookId,
        /// Feature on the home page.
        #[arg(long)]
        popular: Option<bool>,
        /// Mark as not yet released.
        #[arg(long)]
        upcoming: Option<bool>,
    },
    /// Remove a book (staff only).
    Remove {
        /// Book ID.
        id: BookId,
    },
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Words to look for in titles and authors. Omit to list every book.
    pub query: Vec<String>,
}

/// Arguments for the popular command.
#[derive(Args)]
pub struct PopularArgs {
    /// Show at most N books (default: feed.popular from the config).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the upcoming command.
#[derive(Args)]
pub struct UpcomingArgs {
    #[command(subcommand)]
    pub command: Option<UpcomingCommand>,
}

#[derive(Subcommand)]
pub enum UpcomingCommand {
    /// Announce an upcoming release (staff only).
    Add {
        /// Book title.
        title: String,
        /// Author name.
        author: String,
        /// Expected release date (YYYY-MM-DD).
        #[arg(short, long)]
        release: NaiveDate,
        /// Short summary.
        #[arg(short, long, default_value = "")]
        description: String,
        /// Cover image path.
        #[arg(long)]
        cover: Option<String>,
    },
    /// List upcoming releases, soonest first.
    List {
        /// Show at most N releases.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one upcoming release.
    Show {
        /// Upcoming book ID.
        id: UpcomingBookId,
    },
}

/// Arguments for the review command.
#[derive(Args)]
pub struct ReviewArgs {
    #[command(subcommand)]
    pub command: ReviewCommand,
}

#[derive(Subcommand)]
pub enum ReviewCommand {
    /// Review a book.
    Add {
        /// Book ID.
        book: BookId,
        /// Review text.
        content: String,
    },
    /// List a book's reviews, newest first.
    List {
        /// Book ID.
        book: BookId,
    },
    /// Latest reviews across all books.
    Recent {
        /// Show at most N reviews.
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart and its total.
    Show,
    /// Add copies of a book.
    Add {
        /// Book ID.
        book: BookId,
        /// Number of copies to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
    /// Remove a line from the cart.
    Remove {
        /// Cart item ID.
        item: CartItemId,
    },
}
