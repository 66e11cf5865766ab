//! Commerce error types.

use thiserror::Error;

/// Errors raised by the domain types when input breaks an invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Amount string could not be parsed as a two-digit decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Price outside the range a book may carry.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}
