//! Search module.
//!
//! Case-insensitive substring search over titles and authors.

mod query;

pub use query::SearchQuery;
