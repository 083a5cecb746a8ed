//! Cart lines and the storage codec for order item sequences.
//!
//! A cart line is a transient client value; it is only ever persisted as the
//! JSON-encoded `items` text column of an order row. That textual shape is a
//! compatibility contract with the storage schema, so the encode/decode pair
//! here is the single place where it exists - everything else in the system
//! handles `Vec<CartLine>`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// One (item, quantity, price) triple inside an order's item sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Menu item the line refers to.
    pub item_id: ItemId,
    /// Number of units ordered.
    pub quantity: u32,
    /// Unit price at the time the cart was built (client-supplied).
    pub unit_price: Decimal,
}

impl CartLine {
    /// Encode a line sequence to the textual form stored in the `items`
    /// column.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn encode_all(lines: &[Self]) -> Result<String, serde_json::Error> {
        serde_json::to_string(lines)
    }

    /// Decode a stored `items` column back into a line sequence.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the stored text is not a valid
    /// line sequence.
    pub fn decode_all(text: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(text)
    }
}
