//! Shopping cart module.
//!
//! Contains types for carts, cart items and pricing.

mod cart;
mod pricing;

pub use cart::{validate_delta, Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{cart_total, CartPricing, LineItemPricing};
