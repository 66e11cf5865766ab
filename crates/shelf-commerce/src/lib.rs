//! Bookstore domain types and logic.
//!
//! This crate holds the data model shared by the stores and the CLI:
//!
//! - **Catalog**: Books and announced upcoming releases
//! - **Cart**: One cart per user, one item per book, live-price totals
//! - **Reviews**: Immutable user reviews
//! - **Search**: Case-insensitive title/author matching
//!
//! Nothing here performs I/O; persistence lives in `shelf-db`.
//!
//! # Example
//!
//! ```rust
//! use shelf_commerce::prelude::*;
//!
//! let price: Money = "9.99".parse().unwrap();
//! let book = NewBook::new("The Hobbit", "J.R.R. Tolkien", price).popular();
//! assert!(book.validate().is_ok());
//! assert_eq!((price * 3).to_string(), "29.97");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod review;
pub mod search;

pub use cart::cart_total;
pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{Book, BookDetail, NewBook, NewUpcomingBook, UpcomingBook};

    // Cart
    pub use crate::cart::{cart_total, Cart, CartItem, CartPricing, LineItemPricing};

    // Reviews
    pub use crate::review::{Review, ReviewSummary};

    // Search
    pub use crate::search::SearchQuery;
}
