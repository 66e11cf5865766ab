//! Upcoming release types.
//!
//! Upcoming books are announcements, not stock: they never appear in carts
//! or reviews and are not linked to a `Book`.

use crate::catalog::book::{MAX_AUTHOR_LEN, MAX_TITLE_LEN};
use crate::catalog::validate_text;
use crate::error::CommerceError;
use crate::ids::UpcomingBookId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A book planned for future release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpcomingBook {
    pub id: UpcomingBookId,
    pub title: String,
    pub author: String,
    /// Expected release date.
    pub release_date: NaiveDate,
    pub cover_image: Option<String>,
    /// Short summary; may be empty.
    pub description: String,
}

/// Input for announcing an upcoming book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUpcomingBook {
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
    pub cover_image: Option<String>,
    pub description: String,
}

impl NewUpcomingBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            release_date,
            cover_image: None,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cover_image(mut self, path: impl Into<String>) -> Self {
        self.cover_image = Some(path.into());
        self
    }

    /// Check field lengths.
    pub fn validate(&self) -> Result<(), CommerceError> {
        validate_text("title", &self.title, MAX_TITLE_LEN)?;
        validate_text("author", &self.author, MAX_AUTHOR_LEN)
    }
}
