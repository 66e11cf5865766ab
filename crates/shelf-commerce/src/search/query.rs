//! Title/author search.

use crate::catalog::Book;
use serde::{Deserialize, Serialize};

/// A catalog search.
///
/// Matches books whose title or author contains the query text, ignoring
/// case. A missing or blank query matches every book. There is no ranking:
/// results keep the order they were given in.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Text query, already lowercased. Whitespace is kept as given.
    needle: Option<String>,
}

impl SearchQuery {
    /// Create a query that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from optional user input.
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some(q) => Self::new().with_query(q),
            None => Self::new(),
        }
    }

    /// Set the text query. Blank text leaves the query matching everything;
    /// otherwise the text is matched as typed, surrounding spaces included.
    pub fn with_query(mut self, q: impl AsRef<str>) -> Self {
        let q = q.as_ref();
        self.needle = if q.trim().is_empty() {
            None
        } else {
            Some(q.to_lowercase())
        };
        self
    }

    /// The normalized query text, if any.
    pub fn text(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Check a single book against the query.
    pub fn matches(&self, book: &Book) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => {
                book.title.to_lowercase().contains(needle.as_str())
                    || book.author.to_lowercase().contains(needle.as_str())
            }
        }
    }

    /// Keep the matching books, preserving order.
    pub fn apply(&self, books: impl IntoIterator<Item = Book>) -> Vec<Book> {
        books.into_iter().filter(|b| self.matches(b)).collect()
    }
}
