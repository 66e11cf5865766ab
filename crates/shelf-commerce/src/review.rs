//! Review types.

use crate::error::CommerceError;
use crate::ids::{BookId, ReviewId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review left by a user on a book. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub user_id: UserId,
    /// Username of the reviewer, for display.
    pub username: String,
    pub content: String,
    /// Assigned by the store when the review is written.
    pub created_at: DateTime<Utc>,
}

/// A review with the title of the book it belongs to, for cross-book feeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewSummary {
    #[serde(flatten)]
    pub review: Review,
    pub book_title: String,
}

/// Reject review bodies that are empty or whitespace only.
pub fn validate_content(content: &str) -> Result<(), CommerceError> {
    if content.trim().is_empty() {
        return Err(CommerceError::ValidationError(
            "review content must not be empty".to_string(),
        ));
    }
    Ok(())
}
