//! SQLite persistence for the bookstore.
//!
//! A [`Db`] owns one connection to the store file. The stores borrow it and
//! expose the operations the application needs:
//!
//! - [`CatalogStore`]: search, popular and upcoming listings, staff edits
//! - [`ReviewStore`]: append-only reviews
//! - [`CartEngine`]: one cart per user, atomic quantity updates
//! - [`UserDirectory`]: registered users and identity resolution
//!
//! Store operations take the acting [`User`](shelf_auth::User) explicitly.
//!
//! # Example
//!
//! ```rust
//! use shelf_auth::Role;
//! use shelf_commerce::{catalog::NewBook, Money};
//! use shelf_db::{CartEngine, CatalogStore, Db, UserDirectory};
//!
//! let db = Db::open_in_memory()?;
//! let users = UserDirectory::new(&db);
//! let staff = users.create_user("gandalf", Role::Staff)?;
//! let reader = users.create_user("bilbo", Role::Customer)?;
//!
//! let book = CatalogStore::new(&db)
//!     .add_book(&staff, NewBook::new("The Hobbit", "J.R.R. Tolkien", Money::new(999)))?;
//!
//! let carts = CartEngine::new(&db);
//! carts.add_item(&reader, book.id, 3)?;
//! let cart = carts.get_or_create_cart(&reader)?;
//! assert_eq!(cart.total_price().to_string(), "29.97");
//! # Ok::<(), shelf_db::StoreError>(())
//! ```

mod carts;
mod catalog;
mod config;
mod db;
mod error;
mod reviews;
mod schema;
mod users;

pub use carts::CartEngine;
pub use catalog::{CatalogStore, FeedLimits, HomeFeed};
pub use config::DbConfig;
pub use db::Db;
pub use error::{Result, StoreError};
pub use reviews::ReviewStore;
pub use schema::SCHEMA_VERSION;
pub use users::{UserDirectory, MAX_USERNAME_LEN};
