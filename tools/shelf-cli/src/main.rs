//! Shelf CLI - command line front end for the bookstore.
//!
//! Commands:
//! - `shelf init` - Write a config file and create the database
//! - `shelf user` - Register and remove users
//! - `shelf book` - Show books and edit the catalog
//! - `shelf search` - Find books by title or author
//! - `shelf popular` - List featured books
//! - `shelf upcoming` - Announce and list upcoming releases
//! - `shelf home` - Show the home page feed
//! - `shelf review` - Post and read reviews
//! - `shelf cart` - Manage your shopping cart

mod commands;
mod config;
mod context;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use commands::{
    BookArgs, CartArgs, InitArgs, PopularArgs, ReviewArgs, SearchArgs, UpcomingArgs, UserArgs,
};

/// Shelf - browse the catalog, review books and fill your cart
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Act as this registered user
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write shelf.toml and create the database
    Init(InitArgs),

    /// Manage registered users
    User(UserArgs),

    /// Show a book or edit the catalog
    Book(BookArgs),

    /// Search books by title or author
    Search(SearchArgs),

    /// List popular books
    Popular(PopularArgs),

    /// Upcoming releases
    Upcoming(UpcomingArgs),

    /// Show the home page feed
    Home,

    /// Post and read reviews
    Review(ReviewArgs),

    /// Manage your shopping cart
    Cart(CartArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.json);

    // Load config
    let ctx = context::Context::load(
        cli.config.as_deref(),
        cli.db.as_deref(),
        cli.user.as_deref(),
        output,
    )?;

    init_tracing(&ctx.config.log.filter, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx),
        Commands::User(args) => commands::users::run(args, &ctx),
        Commands::Book(args) => commands::books::run(args, &ctx),
        Commands::Search(args) => commands::books::search(args, &ctx),
        Commands::Popular(args) => commands::books::popular(args, &ctx),
        Commands::Upcoming(args) => commands::upcoming::run(args, &ctx),
        Commands::Home => commands::home::run(&ctx),
        Commands::Review(args) => commands::reviews::run(args, &ctx),
        Commands::Cart(args) => commands::cart::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the config file; `--verbose` adds
/// debug output for the bookstore crates.
fn init_tracing(config_filter: &str, verbose: bool) {
    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        for directive in ["shelf=debug", "shelf_db=debug"] {
            if let Ok(directive) = directive.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
