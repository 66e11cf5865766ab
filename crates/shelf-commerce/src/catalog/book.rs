//! Book types.

use crate::catalog::validate_text;
use crate::error::CommerceError;
use crate::ids::BookId;
use crate::money::Money;
use crate::review::Review;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest title a book may carry.
pub const MAX_TITLE_LEN: usize = 200;

/// Longest author name a book may carry.
pub const MAX_AUTHOR_LEN: usize = 100;

/// Highest price a book may carry (six digits, two of them fractional).
pub const MAX_PRICE: Money = Money::new(999_999);

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Unique book identifier.
    pub id: BookId,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Long-form summary.
    pub description: String,
    /// Current retail price. Carts always read this live.
    pub price: Money,
    /// Path of the uploaded cover image, if any.
    pub cover_image: Option<String>,
    /// Publication date, if known.
    pub release_date: Option<NaiveDate>,
    /// Featured on the home page.
    pub is_popular: bool,
    /// Marked as not yet released.
    pub is_upcoming: bool,
}

impl Book {
    /// Short label used in listings (e.g., "Dune by Frank Herbert").
    pub fn label(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }
}

/// Input for adding a book to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Money,
    pub cover_image: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub is_popular: bool,
    pub is_upcoming: bool,
}

impl NewBook {
    /// Create a book with the required fields; everything else defaults.
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: Money) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: String::new(),
            price,
            cover_image: None,
            release_date: None,
            is_popular: false,
            is_upcoming: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the cover image reference.
    pub fn with_cover_image(mut self, path: impl Into<String>) -> Self {
        self.cover_image = Some(path.into());
        self
    }

    /// Set the release date.
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Flag the book as popular.
    pub fn popular(mut self) -> Self {
        self.is_popular = true;
        self
    }

    /// Flag the book as upcoming.
    pub fn upcoming(mut self) -> Self {
        self.is_upcoming = true;
        self
    }

    /// Check field lengths and the price range.
    pub fn validate(&self) -> Result<(), CommerceError> {
        validate_text("title", &self.title, MAX_TITLE_LEN)?;
        validate_text("author", &self.author, MAX_AUTHOR_LEN)?;
        validate_price(self.price)
    }
}

/// Check that a price is within `0.00..=9999.99`.
pub fn validate_price(price: Money) -> Result<(), CommerceError> {
    if price.is_negative() || price > MAX_PRICE {
        return Err(CommerceError::InvalidPrice(price.to_string()));
    }
    Ok(())
}

/// A book together with its reviews, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookDetail {
    pub book: Book,
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_defaults() {
        let book = NewBook::new("Dune", "Frank Herbert", Money::new(999));
        assert!(book.description.is_empty());
        assert!(!book.is_popular);
        assert!(!book.is_upcoming);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_new_book_builder() {
        let date = NaiveDate::from_ymd_opt(1965, 8, 1).unwrap();
        let book = NewBook::new("Dune", "Frank Herbert", Money::new(999))
            .with_description("Spice")
            .with_cover_image("book_covers/dune.jpg")
            .with_release_date(date)
            .popular();
        assert_eq!(book.release_date, Some(date));
        assert_eq!(book.cover_image.as_deref(), Some("book_covers/dune.jpg"));
        assert!(book.is_popular);
    }

    #[test]
    fn test_blank_title_rejected() {
        let book = NewBook::new("   ", "Frank Herbert", Money::new(999));
        assert!(matches!(book.validate(), Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_long_author_rejected() {
        let book = NewBook::new("Dune", "x".repeat(MAX_AUTHOR_LEN + 1), Money::new(999));
        assert!(book.validate().is_err());
    }

    #[test]
    fn test_price_range() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(MAX_PRICE).is_ok());
        assert_eq!(
            validate_price(Money::new(1_000_000)),
            Err(CommerceError::InvalidPrice("10000.00".to_string()))
        );
        assert!(validate_price(Money::new(-1)).is_err());
    }
}
