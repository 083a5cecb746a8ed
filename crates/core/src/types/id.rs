//! Newtype IDs for type-safe entity references.
//!
//! Row-backed entities (menu items, orders) carry `i64` keys generated by the
//! backing store; identities are opaque strings minted by the auth service.
//! The `define_id!` macro keeps the two order ID spaces from mixing.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe `i64` ID wrapper.
///
/// Creates a newtype with `Serialize`/`Deserialize` (`#[serde(transparent)]`),
/// the usual derives, and `new()`/`as_i64()` conversions.
///
/// # Example
///
/// ```rust
/// # use sabor_core::define_id;
/// define_id!(TicketId);
///
/// let id = TicketId::new(7);
/// assert_eq!(id.as_i64(), 7);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ItemId);
define_id!(OrderId);

/// Opaque stable user identifier issued by the auth service.
///
/// The backend never mints these itself; it stores whatever the auth
/// collaborator returns (a UUID in practice) and uses it as the owner
/// key on profiles and orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identity string returned by the auth service.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_round_trips_through_json() {
        let id = ItemId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn user_id_is_transparent_string() {
        let id = UserId::new("4f1c2d3e");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"4f1c2d3e\"");
        assert_eq!(id.as_str(), "4f1c2d3e");
    }
}
