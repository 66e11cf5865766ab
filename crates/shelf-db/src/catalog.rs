//! Catalog store: books, upcoming releases, search and the home feed.

use crate::db::{sql_limit, Db};
use crate::error::{Result, StoreError};
use crate::reviews::{recent_summaries, reviews_for_book};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use shelf_auth::{Role, User};
use shelf_commerce::catalog::{
    validate_price, Book, BookDetail, NewBook, NewUpcomingBook, UpcomingBook,
};
use shelf_commerce::review::ReviewSummary;
use shelf_commerce::search::SearchQuery;
use shelf_commerce::{BookId, Money, UpcomingBookId};
use tracing::{debug, info, warn};

const BOOK_COLUMNS: &str = "id, title, author, description, price_cents, cover_image, \
                            release_date, is_popular, is_upcoming";

const UPCOMING_COLUMNS: &str = "id, title, author, release_date, cover_image, description";

/// How many entries each home page section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedLimits {
    pub upcoming: usize,
    pub popular: usize,
    pub reviews: usize,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            upcoming: 5,
            popular: 5,
            reviews: 5,
        }
    }
}

/// The three home page sections, read together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeFeed {
    pub upcoming: Vec<UpcomingBook>,
    pub popular: Vec<Book>,
    pub recent_reviews: Vec<ReviewSummary>,
}

/// Read and edit access to the catalog.
///
/// Reads are open to everyone. Edits require a staff user.
#[derive(Debug, Clone, Copy)]
pub struct CatalogStore<'a> {
    db: &'a Db,
}

impl<'a> CatalogStore<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Books whose title or author contains `query`, ignoring case, in
    /// insertion order. A missing or blank query returns every book.
    pub fn search(&self, query: Option<&str>) -> Result<Vec<Book>> {
        let query = SearchQuery::parse(query);
        let books = self.db.read(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS))?;
            let books = stmt
                .query_map([], book_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(books)
        })?;

        let matched = query.apply(books);
        debug!(query = ?query.text(), results = matched.len(), "search");
        Ok(matched)
    }

    /// Upcoming releases, soonest first, at most `limit`.
    pub fn list_upcoming(&self, limit: usize) -> Result<Vec<UpcomingBook>> {
        self.db.read(|conn| upcoming(conn, limit))
    }

    /// Every upcoming release, in the order they were announced.
    pub fn all_upcoming(&self) -> Result<Vec<UpcomingBook>> {
        self.db.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM upcoming_books ORDER BY id",
                UPCOMING_COLUMNS
            ))?;
            let books = stmt
                .query_map([], upcoming_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(books)
        })
    }

    /// One upcoming release.
    pub fn get_upcoming(&self, id: UpcomingBookId) -> Result<UpcomingBook> {
        self.db.read(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM upcoming_books WHERE id = ?1", UPCOMING_COLUMNS),
                [id.get()],
                upcoming_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("upcoming book {}", id)))
        })
    }

    /// Books flagged popular, in insertion order, at most `limit`.
    pub fn list_popular(&self, limit: usize) -> Result<Vec<Book>> {
        self.db.read(|conn| popular(conn, limit))
    }

    /// One book.
    pub fn get_book(&self, id: BookId) -> Result<Book> {
        self.db.read(|conn| book_by_id(conn, id))
    }

    /// A book with its reviews, newest first.
    pub fn book_detail(&self, id: BookId) -> Result<BookDetail> {
        self.db.read(|conn| {
            let book = book_by_id(conn, id)?;
            let reviews = reviews_for_book(conn, id)?;
            Ok(BookDetail { book, reviews })
        })
    }

    /// Upcoming releases, popular books and recent reviews.
    pub fn home_feed(&self, limits: FeedLimits) -> Result<HomeFeed> {
        self.db.read(|conn| {
            Ok(HomeFeed {
                upcoming: upcoming(conn, limits.upcoming)?,
                popular: popular(conn, limits.popular)?,
                recent_reviews: recent_summaries(conn, limits.reviews)?,
            })
        })
    }

    /// Add a book to the catalog.
    pub fn add_book(&self, user: &User, book: NewBook) -> Result<Book> {
        require_staff(user)?;
        book.validate()?;

        let created = self.db.write(|tx| {
            tx.execute(
                "INSERT INTO books (title, author, description, price_cents, cover_image,
                                    release_date, is_popular, is_upcoming)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    book.title,
                    book.author,
                    book.description,
                    book.price.amount_cents,
                    book.cover_image,
                    book.release_date,
                    book.is_popular,
                    book.is_upcoming,
                ],
            )?;
            book_by_id(tx, BookId::new(tx.last_insert_rowid()))
        })?;

        info!(book_id = %created.id, title = %created.title, "book added");
        Ok(created)
    }

    /// Change a book's price. Open carts see the new price immediately.
    pub fn update_price(&self, user: &User, id: BookId, price: Money) -> Result<Book> {
        require_staff(user)?;
        validate_price(price)?;

        let book = self.db.write(|tx| {
            let changed = tx.execute(
                "UPDATE books SET price_cents = ?1 WHERE id = ?2",
                params![price.amount_cents, id.get()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("book {}", id)));
            }
            book_by_id(tx, id)
        })?;

        info!(book_id = %id, price = %price, "price updated");
        Ok(book)
    }

    /// Set the popular and upcoming flags. `None` leaves a flag unchanged.
    pub fn set_flags(
        &self,
        user: &User,
        id: BookId,
        popular: Option<bool>,
        upcoming: Option<bool>,
    ) -> Result<Book> {
        require_staff(user)?;

        self.db.write(|tx| {
            let changed = tx.execute(
                "UPDATE books
                 SET is_popular = COALESCE(?1, is_popular),
                     is_upcoming = COALESCE(?2, is_upcoming)
                 WHERE id = ?3",
                params![popular, upcoming, id.get()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("book {}", id)));
            }
            book_by_id(tx, id)
        })
    }

    /// Remove a book. Its reviews and every cart line holding it go too.
    pub fn delete_book(&self, user: &User, id: BookId) -> Result<()> {
        require_staff(user)?;

        let removed = self
            .db
            .write(|tx| Ok(tx.execute("DELETE FROM books WHERE id = ?1", [id.get()])?))?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!("book {}", id)));
        }
        info!(book_id = %id, "book deleted");
        Ok(())
    }

    /// Announce an upcoming release.
    pub fn add_upcoming(&self, user: &User, book: NewUpcomingBook) -> Result<UpcomingBook> {
        require_staff(user)?;
        book.validate()?;

        let created = self.db.write(|tx| {
            tx.execute(
                "INSERT INTO upcoming_books (title, author, release_date, cover_image, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    book.title,
                    book.author,
                    book.release_date,
                    book.cover_image,
                    book.description,
                ],
            )?;
            Ok(UpcomingBook {
                id: UpcomingBookId::new(tx.last_insert_rowid()),
                title: book.title,
                author: book.author,
                release_date: book.release_date,
                cover_image: book.cover_image,
                description: book.description,
            })
        })?;

        info!(upcoming_id = %created.id, title = %created.title, "upcoming book announced");
        Ok(created)
    }
}

fn require_staff(user: &User) -> Result<()> {
    user.require_role(Role::Staff).map_err(|e| {
        warn!(user = user.display_name(), "catalog edit refused");
        StoreError::from(e)
    })?;
    Ok(())
}

pub(crate) fn book_by_id(conn: &Connection, id: BookId) -> Result<Book> {
    conn.query_row(
        &format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS),
        [id.get()],
        book_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(format!("book {}", id)))
}

fn popular(conn: &Connection, limit: usize) -> Result<Vec<Book>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM books WHERE is_popular = 1 ORDER BY id LIMIT ?1",
        BOOK_COLUMNS
    ))?;
    let books = stmt
        .query_map([sql_limit(limit)], book_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

fn upcoming(conn: &Connection, limit: usize) -> Result<Vec<UpcomingBook>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM upcoming_books ORDER BY release_date, id LIMIT ?1",
        UPCOMING_COLUMNS
    ))?;
    let books = stmt
        .query_map([sql_limit(limit)], upcoming_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: BookId::new(row.get(0)?),
        title: row.get(1)?,
        author: row.get(2)?,
        description: row.get(3)?,
        price: Money::new(row.get(4)?),
        cover_image: row.get(5)?,
        release_date: row.get(6)?,
        is_popular: row.get(7)?,
        is_upcoming: row.get(8)?,
    })
}

fn upcoming_from_row(row: &Row<'_>) -> rusqlite::Result<UpcomingBook> {
    Ok(UpcomingBook {
        id: UpcomingBookId::new(row.get(0)?),
        title: row.get(1)?,
        author: row.get(2)?,
        release_date: row.get(3)?,
        cover_image: row.get(4)?,
        description: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::UserDirectory;
    use chrono::NaiveDate;

    fn staff(db: &Db) -> User {
        UserDirectory::new(db).create_user("gandalf", Role::Staff).unwrap()
    }

    fn seed(db: &Db) -> Vec<Book> {
        let admin = staff(db);
        let catalog = CatalogStore::new(db);
        [
            NewBook::new("The Hobbit", "J.R.R. Tolkien", Money::new(999)).popular(),
            NewBook::new("Dune", "Frank Herbert", Money::new(1299)),
            NewBook::new("The Silmarillion", "J.R.R. Tolkien", Money::new(1500)).popular(),
        ]
        .into_iter()
        .map(|book| catalog.add_book(&admin, book).unwrap())
        .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_search_matches_author_case_insensitively() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let catalog = CatalogStore::new(&db);

        let found = catalog.search(Some("tolkien")).unwrap();
        assert_eq!(found, vec![books[0].clone(), books[2].clone()]);

        let found = catalog.search(Some("DUNE")).unwrap();
        assert_eq!(found, vec![books[1].clone()]);
    }

    #[test]
    fn test_search_keeps_surrounding_whitespace() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let catalog = CatalogStore::new(&db);

        assert!(catalog.search(Some("Hobbit ")).unwrap().is_empty());
        let found = catalog.search(Some("the ")).unwrap();
        assert_eq!(found, vec![books[0].clone(), books[2].clone()]);
    }

    #[test]
    fn test_search_blank_returns_all() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let catalog = CatalogStore::new(&db);

        assert_eq!(catalog.search(None).unwrap(), books);
        assert_eq!(catalog.search(Some("   ")).unwrap(), books);
        assert!(catalog.search(Some("pratchett")).unwrap().is_empty());
    }

    #[test]
    fn test_list_popular_respects_limit_and_order() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let catalog = CatalogStore::new(&db);

        assert_eq!(
            catalog.list_popular(5).unwrap(),
            vec![books[0].clone(), books[2].clone()]
        );
        assert_eq!(catalog.list_popular(1).unwrap(), vec![books[0].clone()]);
        assert!(catalog.list_popular(0).unwrap().is_empty());
    }

    #[test]
    fn test_list_upcoming_soonest_first() {
        let db = Db::open_in_memory().unwrap();
        let admin = staff(&db);
        let catalog = CatalogStore::new(&db);

        let later = catalog
            .add_upcoming(&admin, NewUpcomingBook::new("Winds of Winter", "G.R.R. Martin", date(2031, 1, 1)))
            .unwrap();
        let sooner = catalog
            .add_upcoming(&admin, NewUpcomingBook::new("Doors of Stone", "P. Rothfuss", date(2027, 6, 1)))
            .unwrap();

        assert_eq!(catalog.list_upcoming(5).unwrap(), vec![sooner.clone(), later.clone()]);
        assert_eq!(catalog.list_upcoming(1).unwrap(), vec![sooner.clone()]);
        assert_eq!(catalog.get_upcoming(later.id).unwrap(), later);
        assert!(catalog
            .get_upcoming(UpcomingBookId::new(99))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_all_upcoming_in_announcement_order() {
        let db = Db::open_in_memory().unwrap();
        let admin = staff(&db);
        let catalog = CatalogStore::new(&db);

        let later = catalog
            .add_upcoming(&admin, NewUpcomingBook::new("Winds of Winter", "G.R.R. Martin", date(2031, 1, 1)))
            .unwrap();
        let sooner = catalog
            .add_upcoming(&admin, NewUpcomingBook::new("Doors of Stone", "P. Rothfuss", date(2027, 6, 1)))
            .unwrap();

        let ids: Vec<_> = catalog.all_upcoming().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![later.id, sooner.id]);
        assert_eq!(catalog.list_upcoming(5).unwrap()[0], sooner);
    }

    #[test]
    fn test_get_book_round_trips_optional_fields() {
        let db = Db::open_in_memory().unwrap();
        let admin = staff(&db);
        let catalog = CatalogStore::new(&db);

        let book = catalog
            .add_book(
                &admin,
                NewBook::new("Dune", "Frank Herbert", Money::new(999))
                    .with_description("Spice")
                    .with_cover_image("book_covers/dune.jpg")
                    .with_release_date(date(1965, 8, 1))
                    .upcoming(),
            )
            .unwrap();

        let loaded = catalog.get_book(book.id).unwrap();
        assert_eq!(loaded, book);
        assert_eq!(loaded.release_date, Some(date(1965, 8, 1)));
        assert!(loaded.is_upcoming);
        assert!(catalog.get_book(BookId::new(42)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_edits_require_staff() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let catalog = CatalogStore::new(&db);
        let customer = UserDirectory::new(&db)
            .create_user("bilbo", Role::Customer)
            .unwrap();
        let book = NewBook::new("Dune", "Frank Herbert", Money::new(999));

        assert!(matches!(
            catalog.add_book(&customer, book.clone()),
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            catalog.add_book(&User::Anonymous, book),
            Err(StoreError::NotAuthenticated)
        ));
        assert!(matches!(
            catalog.delete_book(&customer, books[0].id),
            Err(StoreError::Forbidden(_))
        ));
        assert_eq!(catalog.search(None).unwrap().len(), 3);
    }

    #[test]
    fn test_add_book_validates() {
        let db = Db::open_in_memory().unwrap();
        let admin = staff(&db);
        let catalog = CatalogStore::new(&db);

        let blank = NewBook::new("  ", "Anon", Money::new(100));
        assert!(catalog.add_book(&admin, blank).unwrap_err().is_validation());

        let pricey = NewBook::new("Folio", "Anon", Money::new(1_000_000));
        assert!(catalog.add_book(&admin, pricey).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_price_and_flags() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let admin = UserDirectory::new(&db).find_by_username("gandalf").unwrap().unwrap();
        let catalog = CatalogStore::new(&db);

        let updated = catalog.update_price(&admin, books[1].id, Money::new(1499)).unwrap();
        assert_eq!(updated.price, Money::new(1499));
        assert!(catalog
            .update_price(&admin, books[1].id, Money::new(-1))
            .unwrap_err()
            .is_validation());

        let flagged = catalog.set_flags(&admin, books[1].id, Some(true), None).unwrap();
        assert!(flagged.is_popular);
        assert!(!flagged.is_upcoming);
        assert_eq!(catalog.list_popular(5).unwrap().len(), 3);

        assert!(catalog
            .set_flags(&admin, BookId::new(99), Some(false), None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_book() {
        let db = Db::open_in_memory().unwrap();
        let books = seed(&db);
        let admin = UserDirectory::new(&db).find_by_username("gandalf").unwrap().unwrap();
        let catalog = CatalogStore::new(&db);

        catalog.delete_book(&admin, books[0].id).unwrap();
        assert!(catalog.get_book(books[0].id).unwrap_err().is_not_found());
        assert!(catalog.delete_book(&admin, books[0].id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_home_feed_on_empty_store() {
        let db = Db::open_in_memory().unwrap();
        let feed = CatalogStore::new(&db).home_feed(FeedLimits::default()).unwrap();
        assert!(feed.upcoming.is_empty());
        assert!(feed.popular.is_empty());
        assert!(feed.recent_reviews.is_empty());
    }
}
