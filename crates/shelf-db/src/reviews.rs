//! Review store.
//!
//! Reviews are append-only. Ordering is by `created_at` descending, ties
//! broken by the later insert first.

use crate::catalog::book_by_id;
use crate::db::{now, sql_limit, timestamp_column, timestamp_to_sql, Db};
use crate::error::{Result, StoreError};
use crate::users::find_by_id;
use rusqlite::{params, Connection, Row};
use shelf_auth::User;
use shelf_commerce::review::{validate_content, Review, ReviewSummary};
use shelf_commerce::{BookId, ReviewId, UserId};
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct ReviewStore<'a> {
    db: &'a Db,
}

impl<'a> ReviewStore<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Record a review by `user` on a book.
    ///
    /// The timestamp is assigned here. Content is stored exactly as given
    /// but must contain something besides whitespace.
    pub fn add_review(&self, user: &User, book_id: BookId, content: &str) -> Result<Review> {
        let user_id = user.require_id()?;
        validate_content(content)?;

        let review = self.db.write(|tx| {
            book_by_id(tx, book_id)?;
            // Unknown IDs mean the identity is stale.
            let author = find_by_id(tx, user_id)?.ok_or(StoreError::NotAuthenticated)?;

            let created_at = now();
            tx.execute(
                "INSERT INTO reviews (book_id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![book_id.get(), user_id.get(), content, timestamp_to_sql(&created_at)],
            )?;
            Ok(Review {
                id: ReviewId::new(tx.last_insert_rowid()),
                book_id,
                user_id,
                username: author.display_name().to_string(),
                content: content.to_string(),
                created_at,
            })
        })?;

        info!(review_id = %review.id, book_id = %book_id, user_id = %user_id, "review added");
        Ok(review)
    }

    /// Reviews of one book, newest first.
    pub fn list_reviews(&self, book_id: BookId) -> Result<Vec<Review>> {
        self.db.read(|conn| {
            book_by_id(conn, book_id)?;
            reviews_for_book(conn, book_id)
        })
    }

    /// Newest reviews across all books, at most `limit`.
    pub fn recent_reviews(&self, limit: usize) -> Result<Vec<ReviewSummary>> {
        self.db.read(|conn| recent_summaries(conn, limit))
    }
}

pub(crate) fn reviews_for_book(conn: &Connection, book_id: BookId) -> Result<Vec<Review>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.book_id, r.user_id, u.username, r.content, r.created_at
         FROM reviews r
         JOIN users u ON u.id = r.user_id
         WHERE r.book_id = ?1
         ORDER BY r.created_at DESC, r.id DESC",
    )?;
    let reviews = stmt
        .query_map([book_id.get()], review_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(reviews)
}

pub(crate) fn recent_summaries(conn: &Connection, limit: usize) -> Result<Vec<ReviewSummary>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.book_id, r.user_id, u.username, r.content, r.created_at, b.title
         FROM reviews r
         JOIN users u ON u.id = r.user_id
         JOIN books b ON b.id = r.book_id
         ORDER BY r.created_at DESC, r.id DESC
         LIMIT ?1",
    )?;
    let summaries = stmt
        .query_map([sql_limit(limit)], |row| {
            Ok(ReviewSummary {
                review: review_from_row(row)?,
                book_title: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(summaries)
}

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: ReviewId::new(row.get(0)?),
        book_id: BookId::new(row.get(1)?),
        user_id: UserId::new(row.get(2)?),
        username: row.get(3)?,
        content: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::users::UserDirectory;
    use shelf_auth::Role;
    use shelf_commerce::catalog::NewBook;
    use shelf_commerce::Money;

    struct Fixture {
        db: Db,
        reader: User,
        hobbit: BookId,
        dune: BookId,
    }

    fn fixture() -> Fixture {
        let db = Db::open_in_memory().unwrap();
        let users = UserDirectory::new(&db);
        let admin = users.create_user("gandalf", Role::Staff).unwrap();
        let reader = users.create_user("bilbo", Role::Customer).unwrap();
        let catalog = CatalogStore::new(&db);
        let hobbit = catalog
            .add_book(&admin, NewBook::new("The Hobbit", "J.R.R. Tolkien", Money::new(999)))
            .unwrap()
            .id;
        let dune = catalog
            .add_book(&admin, NewBook::new("Dune", "Frank Herbert", Money::new(1299)))
            .unwrap()
            .id;
        Fixture { db, reader, hobbit, dune }
    }

    #[test]
    fn test_add_review_records_author_and_time() {
        let f = fixture();
        let reviews = ReviewStore::new(&f.db);

        let review = reviews.add_review(&f.reader, f.hobbit, "There and back again.").unwrap();
        assert_eq!(review.username, "bilbo");
        assert_eq!(review.content, "There and back again.");

        let listed = reviews.list_reviews(f.hobbit).unwrap();
        assert_eq!(listed, vec![review]);
    }

    #[test]
    fn test_add_review_rejects_blank_content() {
        let f = fixture();
        let reviews = ReviewStore::new(&f.db);

        let err = reviews.add_review(&f.reader, f.hobbit, " \n\t").unwrap_err();
        assert!(err.is_validation());
        assert!(reviews.list_reviews(f.hobbit).unwrap().is_empty());
    }

    #[test]
    fn test_add_review_requires_user_and_book() {
        let f = fixture();
        let reviews = ReviewStore::new(&f.db);

        assert!(matches!(
            reviews.add_review(&User::Anonymous, f.hobbit, "Great"),
            Err(StoreError::NotAuthenticated)
        ));
        assert!(reviews
            .add_review(&f.reader, BookId::new(99), "Great")
            .unwrap_err()
            .is_not_found());

        let ghost = User::authenticated(UserId::new(404), "ghost", Role::Customer);
        assert!(matches!(
            reviews.add_review(&ghost, f.hobbit, "Boo"),
            Err(StoreError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_list_reviews_newest_first_with_ties_by_insert() {
        let f = fixture();
        let reviews = ReviewStore::new(&f.db);

        let first = reviews.add_review(&f.reader, f.hobbit, "first").unwrap();
        let second = reviews.add_review(&f.reader, f.hobbit, "second").unwrap();
        reviews.add_review(&f.reader, f.dune, "elsewhere").unwrap();

        // Force identical timestamps to exercise the tie-break.
        f.db.read(|conn| Ok(conn.execute("UPDATE reviews SET created_at = 1000", [])?))
            .unwrap();

        let ids: Vec<_> = reviews
            .list_reviews(f.hobbit)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_list_reviews_unknown_book() {
        let f = fixture();
        assert!(ReviewStore::new(&f.db)
            .list_reviews(BookId::new(99))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_recent_reviews_across_books() {
        let f = fixture();
        let reviews = ReviewStore::new(&f.db);

        reviews.add_review(&f.reader, f.hobbit, "one").unwrap();
        reviews.add_review(&f.reader, f.dune, "two").unwrap();
        reviews.add_review(&f.reader, f.hobbit, "three").unwrap();

        let recent = reviews.recent_reviews(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].review.content, "three");
        assert_eq!(recent[0].book_title, "The Hobbit");
        assert_eq!(recent[1].book_title, "Dune");
    }
}
