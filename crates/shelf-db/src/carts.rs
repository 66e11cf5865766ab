//! Cart engine.
//!
//! Every cart operation acts on the cart of the user passed in; there is no
//! way to name another user's cart. Each operation is a single immediate
//! transaction, so concurrent requests for the same user never create a
//! second cart, never create a second line for the same book, and never
//! lose an increment.

use crate::catalog::book_by_id;
use crate::db::{now, timestamp_column, timestamp_to_sql, Db};
use crate::error::{is_foreign_key_violation, Result, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use shelf_auth::User;
use shelf_commerce::cart::{validate_delta, Cart, CartItem, MAX_QUANTITY_PER_ITEM};
use shelf_commerce::{cart_total, BookId, CartId, CartItemId, Money, UserId};
use tracing::{debug, info, warn};

/// Cart operations for the calling user.
#[derive(Debug, Clone, Copy)]
pub struct CartEngine<'a> {
    db: &'a Db,
}

impl<'a> CartEngine<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Return the user's cart with its items, creating an empty cart on
    /// first use.
    pub fn get_or_create_cart(&self, user: &User) -> Result<Cart> {
        let user_id = user.require_id()?;
        self.db.write(|tx| {
            let (cart_id, created_at) = ensure_cart(tx, user_id)?;
            let mut cart = Cart::new(cart_id, user_id, created_at);
            cart.items = load_items(tx, cart_id)?;
            Ok(cart)
        })
    }

    /// Add `delta` copies of a book to the user's cart.
    ///
    /// The first add creates the line with quantity `delta`; later adds
    /// increase it. Fails with `Validation` when `delta` is not positive or
    /// the line would exceed the per-item cap, and with `NotFound` when the
    /// book does not exist. Nothing is written on failure.
    pub fn add_item(&self, user: &User, book_id: BookId, delta: i64) -> Result<CartItem> {
        let user_id = user.require_id()?;
        validate_delta(delta)?;

        let item = self.db.write(|tx| {
            let book = book_by_id(tx, book_id)?;
            let (cart_id, _) = ensure_cart(tx, user_id)?;

            let row = tx
                .query_row(
                    "INSERT INTO cart_items (cart_id, book_id, quantity) VALUES (?1, ?2, ?3)
                     ON CONFLICT (cart_id, book_id) DO UPDATE
                         SET quantity = cart_items.quantity + excluded.quantity
                         WHERE cart_items.quantity + excluded.quantity <= ?4
                     RETURNING id, quantity",
                    params![cart_id.get(), book_id.get(), delta, MAX_QUANTITY_PER_ITEM],
                    |row| Ok((CartItemId::new(row.get(0)?), row.get::<_, i64>(1)?)),
                )
                .optional()?;

            let Some((id, quantity)) = row else {
                let current = line_quantity(tx, cart_id, book_id)?;
                warn!(user_id = %user_id, book_id = %book_id, current, delta, "quantity cap reached");
                return Err(StoreError::Validation(format!(
                    "quantity {} exceeds maximum allowed ({})",
                    current + delta,
                    MAX_QUANTITY_PER_ITEM
                )));
            };

            Ok(CartItem {
                id,
                cart_id,
                book_id,
                title: book.title,
                unit_price: book.price,
                quantity,
            })
        })?;

        info!(
            user_id = %user_id,
            book_id = %book_id,
            delta,
            quantity = item.quantity,
            "cart item added"
        );
        Ok(item)
    }

    /// Delete a line from the user's cart.
    ///
    /// A line that does not exist and a line in someone else's cart fail
    /// the same way, with `NotFound`.
    pub fn remove_item(&self, user: &User, item_id: CartItemId) -> Result<()> {
        let user_id = user.require_id()?;

        let removed = self.db.write(|tx| {
            Ok(tx.execute(
                "DELETE FROM cart_items
                 WHERE id = ?1
                   AND cart_id IN (SELECT id FROM carts WHERE user_id = ?2)",
                params![item_id.get(), user_id.get()],
            )?)
        })?;

        if removed == 0 {
            warn!(user_id = %user_id, item_id = %item_id, "cart item not removable");
            return Err(StoreError::NotFound(format!("cart item {}", item_id)));
        }
        info!(user_id = %user_id, item_id = %item_id, "cart item removed");
        Ok(())
    }

    /// Sum of price times quantity over the cart's lines.
    pub fn cart_total(cart: &Cart) -> Money {
        cart_total(cart)
    }
}

/// Find the user's cart, inserting it if missing.
fn ensure_cart(conn: &Connection, user_id: UserId) -> Result<(CartId, DateTime<Utc>)> {
    let inserted = conn
        .execute(
            "INSERT INTO carts (user_id, created_at) VALUES (?1, ?2)
             ON CONFLICT (user_id) DO NOTHING",
            params![user_id.get(), timestamp_to_sql(&now())],
        )
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::NotAuthenticated
            } else {
                StoreError::Database(e)
            }
        })?;
    if inserted > 0 {
        debug!(user_id = %user_id, "cart created");
    }

    Ok(conn.query_row(
        "SELECT id, created_at FROM carts WHERE user_id = ?1",
        [user_id.get()],
        |row| Ok((CartId::new(row.get(0)?), timestamp_column(row, 1)?)),
    )?)
}

fn load_items(conn: &Connection, cart_id: CartId) -> Result<Vec<CartItem>> {
    let mut stmt = conn.prepare(
        "SELECT ci.id, ci.book_id, b.title, b.price_cents, ci.quantity
         FROM cart_items ci
         JOIN books b ON b.id = ci.book_id
         WHERE ci.cart_id = ?1
         ORDER BY ci.id",
    )?;
    let items = stmt
        .query_map([cart_id.get()], |row| {
            Ok(CartItem {
                id: CartItemId::new(row.get(0)?),
                cart_id,
                book_id: BookId::new(row.get(1)?),
                title: row.get(2)?,
                unit_price: Money::new(row.get(3)?),
                quantity: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}

fn line_quantity(conn: &Connection, cart_id: CartId, book_id: BookId) -> Result<i64> {
    Ok(conn
        .query_row(
            "SELECT quantity FROM cart_items WHERE cart_id = ?1 AND book_id = ?2",
            [cart_id.get(), book_id.get()],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0))
}
