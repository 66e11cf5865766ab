//! Money type for representing prices.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Book prices carry
//! exactly two fraction digits, so a price like `9.99` is stored as `999`.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Number of fraction digits carried by every amount.
pub const DECIMAL_PLACES: u32 = 2;

const CENTS_PER_UNIT: i64 = 10_i64.pow(DECIMAL_PLACES);

/// A monetary value in the store currency.
///
/// Amounts are stored in cents. Parsing and display never go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a zero amount.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("${}", self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        let unit = CENTS_PER_UNIT as u64;
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / unit,
            abs % unit,
            width = DECIMAL_PLACES as usize
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents + other.amount_cents)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        Money::new(self.amount_cents * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_amount())
    }
}

/// Parses a decimal string such as `"12"`, `"9.9"` or `"9.99"`.
///
/// More than two fraction digits is an error rather than a rounding.
impl FromStr for Money {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CommerceError::InvalidAmount(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > DECIMAL_PLACES as usize {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut fraction_cents: i64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| invalid())?
        };
        for _ in fraction.len()..DECIMAL_PLACES as usize {
            fraction_cents *= 10;
        }

        let cents = whole
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or(CommerceError::Overflow)?;

        Ok(Money::new(if negative { -cents } else { cents }))
    }
}
