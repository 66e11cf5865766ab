//! Deletes propagate to dependent rows.

use shelf_auth::{Role, User};
use shelf_commerce::{catalog::NewBook, BookId, Money};
use shelf_db::{CartEngine, CatalogStore, Db, ReviewStore, UserDirectory};

fn count(db: &Db, table: &str) -> i64 {
    db.read(|conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?)
    })
    .unwrap()
}

fn setup(db: &Db) -> (User, User, BookId, BookId) {
    let users = UserDirectory::new(db);
    let staff = users.create_user("gandalf", Role::Staff).unwrap();
    let reader = users.create_user("bilbo", Role::Customer).unwrap();
    let catalog = CatalogStore::new(db);
    let hobbit = catalog
        .add_book(&staff, NewBook::new("The Hobbit", "J.R.R. Tolkien", Money::new(999)))
        .unwrap()
        .id;
    let dune = catalog
        .add_book(&staff, NewBook::new("Dune", "Frank Herbert", Money::new(1299)))
        .unwrap()
        .id;
    (staff, reader, hobbit, dune)
}

#[test]
fn test_deleting_book_removes_reviews_and_cart_lines() {
    let db = Db::open_in_memory().unwrap();
    let (staff, reader, hobbit, dune) = setup(&db);

    let reviews = ReviewStore::new(&db);
    reviews.add_review(&reader, hobbit, "Lovely").unwrap();
    reviews.add_review(&reader, dune, "Sandy").unwrap();

    let carts = CartEngine::new(&db);
    carts.add_item(&reader, hobbit, 2).unwrap();
    carts.add_item(&reader, dune, 1).unwrap();

    CatalogStore::new(&db).delete_book(&staff, hobbit).unwrap();

    let cart = carts.get_or_create_cart(&reader).unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].book_id, dune);
    assert_eq!(cart.total_price(), Money::new(1299));

    assert_eq!(count(&db, "reviews"), 1);
    assert!(reviews.list_reviews(hobbit).unwrap_err().is_not_found());
    assert_eq!(reviews.recent_reviews(10).unwrap()[0].book_title, "Dune");
}

#[test]
fn test_deleting_user_removes_cart_and_reviews() {
    let db = Db::open_in_memory().unwrap();
    let (_staff, reader, hobbit, _dune) = setup(&db);

    ReviewStore::new(&db).add_review(&reader, hobbit, "Lovely").unwrap();
    CartEngine::new(&db).add_item(&reader, hobbit, 2).unwrap();

    UserDirectory::new(&db)
        .delete_user(reader.user_id().unwrap())
        .unwrap();

    assert_eq!(count(&db, "carts"), 0);
    assert_eq!(count(&db, "cart_items"), 0);
    assert_eq!(count(&db, "reviews"), 0);
    assert_eq!(count(&db, "books"), 2);
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");

    let book = {
        let db = Db::open_path(&path).unwrap();
        let (_staff, reader, hobbit, _dune) = setup(&db);
        CartEngine::new(&db).add_item(&reader, hobbit, 3).unwrap();
        hobbit
    };

    let db = Db::open_path(&path).unwrap();
    let reader = UserDirectory::new(&db).resolve(Some("bilbo")).unwrap();
    let cart = CartEngine::new(&db).get_or_create_cart(&reader).unwrap();
    assert_eq!(cart.items[0].book_id, book);
    assert_eq!(cart.items[0].quantity, 3);
}
