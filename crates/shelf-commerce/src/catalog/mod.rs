//! Book catalog module.
//!
//! Contains types for books in stock and announced upcoming releases.

mod book;
mod upcoming;

pub use book::{validate_price, Book, BookDetail, NewBook, MAX_AUTHOR_LEN, MAX_PRICE, MAX_TITLE_LEN};
pub use upcoming::{NewUpcomingBook, UpcomingBook};

use crate::error::CommerceError;

/// Reject blank text and text longer than `max` characters.
pub(crate) fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CommerceError> {
    if value.trim().is_empty() {
        return Err(CommerceError::ValidationError(format!("{} must not be blank", field)));
    }
    if value.chars().count() > max {
        return Err(CommerceError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
