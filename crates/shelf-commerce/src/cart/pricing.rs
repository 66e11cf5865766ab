//! Cart pricing.
//!
//! Totals are derived on every read and never stored, so a price change in
//! the catalog shows up in every cart holding that book.

use crate::cart::Cart;
use crate::ids::CartItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Sum `total_price` over the cart's items. An empty cart totals zero.
pub fn cart_total(cart: &Cart) -> Money {
    cart.items.iter().map(|item| item.total_price()).sum()
}

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartPricing {
    /// Per-line pricing.
    pub line_items: Vec<LineItemPricing>,
    /// Grand total.
    pub total: Money,
}

/// Pricing for a single cart item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemPricing {
    pub cart_item_id: CartItemId,
    pub unit_price: Money,
    pub quantity: i64,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::ids::{BookId, CartId, UserId};
    use chrono::Utc;

    #[test]
    fn test_total_follows_live_price() {
        let mut cart = Cart::new(CartId::new(1), UserId::new(1), Utc::now());
        cart.items.push(CartItem {
            id: CartItemId::new(1),
            cart_id: cart.id,
            book_id: BookId::new(1),
            title: "Dune".to_string(),
            unit_price: Money::new(999),
            quantity: 3,
        });
        assert_eq!(cart_total(&cart), Money::new(2997));

        cart.items[0].unit_price = Money::new(1200);
        assert_eq!(cart_total(&cart), Money::new(3600));
    }
}
