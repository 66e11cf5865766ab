//! Newtype IDs for type-safe identifiers.
//!
//! Every record is keyed by a store-assigned integer. Wrapping them prevents
//! passing a `BookId` where a `CartItemId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A store-assigned identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw row id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(BookId);
define_id!(UpcomingBookId);
define_id!(ReviewId);
define_id!(CartId);
define_id!(CartItemId);
define_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = BookId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(BookId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CartItemId::new(7).to_string(), "7");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!(" 15 ".parse::<UserId>().unwrap(), UserId::new(15));
        assert!("abc".parse::<UserId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&ReviewId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
