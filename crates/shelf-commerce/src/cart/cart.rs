//! Cart and cart item types.

use crate::cart::pricing::{cart_total, CartPricing, LineItemPricing};
use crate::error::CommerceError;
use crate::ids::{BookId, CartId, CartItemId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A user's shopping cart.
///
/// There is at most one cart per user, and at most one item per book.
/// Items carry the book's price as read from the catalog when the cart was
/// loaded, so totals always reflect current prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was first created.
    pub created_at: DateTime<Utc>,
    /// Items in the cart, in the order they were first added.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(id: CartId, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            created_at,
            items: Vec::new(),
        }
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of distinct books.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by ID.
    pub fn get_item(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Get the item holding a given book.
    pub fn get_item_by_book(&self, book_id: BookId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.book_id == book_id)
    }

    /// Sum of all item totals; zero for an empty cart.
    pub fn total_price(&self) -> Money {
        cart_total(self)
    }

    /// Per-line breakdown plus the grand total.
    pub fn calculate_pricing(&self) -> CartPricing {
        CartPricing {
            line_items: self
                .items
                .iter()
                .map(|item| LineItemPricing {
                    cart_item_id: item.id,
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    total: item.total_price(),
                })
                .collect(),
            total: self.total_price(),
        }
    }
}

/// One book line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    /// Unique item identifier.
    pub id: CartItemId,
    /// Owning cart.
    pub cart_id: CartId,
    /// Book being purchased.
    pub book_id: BookId,
    /// Book title (read from the catalog, for display).
    pub title: String,
    /// Current book price.
    pub unit_price: Money,
    /// Number of copies, at least 1.
    pub quantity: i64,
}

impl CartItem {
    /// Price of the book times quantity.
    pub fn total_price(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Check an amount to add to a line: positive and within the per-item cap.
pub fn validate_delta(delta: i64) -> Result<(), CommerceError> {
    if delta <= 0 {
        return Err(CommerceError::InvalidQuantity(delta));
    }
    if delta > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(delta, MAX_QUANTITY_PER_ITEM));
    }
    Ok(())
}
