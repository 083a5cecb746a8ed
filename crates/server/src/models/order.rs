//! Order entities and their row codecs.
//!
//! Two distinct entities: a plain [`Order`] recorded at checkout, and a
//! [`FinalizedOrder`] that additionally captures delivery details. Both embed
//! their cart lines as a JSON-encoded text column (`items`) in storage; the
//! conversion happens only here.
//!
//! Totals are client-supplied and stored as-is. The backend does not
//! recompute them from line prices; that trade-off is documented, not fixed
//! silently.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use sabor_core::{CartLine, OrderId, OrderStatus, UserId};

use crate::error::ApiError;

/// A persisted checkout record owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// Stored shape of an order row; `items` is opaque text here.
#[derive(Deserialize)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    items: String,
    total: Decimal,
    status: OrderStatus,
    #[serde(default)]
    details: String,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Reconstitute an order from a stored row, decoding the item sequence.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the row is missing fields or the
    /// stored `items` text is corrupt.
    pub fn from_row(row: Value) -> Result<Self, serde_json::Error> {
        let row: OrderRow = serde_json::from_value(row)?;
        let items = CartLine::decode_all(&row.items)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            items,
            total: row.total,
            status: row.status,
            details: row.details,
            created_at: row.created_at,
        })
    }
}

/// A validated order submission, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub details: String,
}

impl NewOrder {
    /// Check required fields before any persistence is attempted.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on the first missing or empty field.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_lines(&self.items, self.total)?;
        if self.details.trim().is_empty() {
            return Err(ApiError::Validation("details are required".to_owned()));
        }
        Ok(())
    }

    /// Build the row to insert. The owner always comes from the resolved
    /// identity, never from client input.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the item sequence cannot be encoded.
    pub fn into_row(self, owner: &UserId) -> Result<Value, serde_json::Error> {
        Ok(json!({
            "user_id": owner,
            "items": CartLine::encode_all(&self.items)?,
            "total": self.total,
            "status": OrderStatus::Pending,
            "details": self.details,
        }))
    }
}

/// A checkout record with delivery details attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizedOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct FinalizedOrderRow {
    id: OrderId,
    user_id: UserId,
    name: String,
    phone: String,
    address: String,
    payment_method: String,
    #[serde(default)]
    notes: Option<String>,
    items: String,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl FinalizedOrder {
    /// Reconstitute a finalized order from a stored row.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the row is missing fields or the
    /// stored `items` text is corrupt.
    pub fn from_row(row: Value) -> Result<Self, serde_json::Error> {
        let row: FinalizedOrderRow = serde_json::from_value(row)?;
        let items = CartLine::decode_all(&row.items)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            payment_method: row.payment_method,
            notes: row.notes,
            items,
            total: row.total,
            created_at: row.created_at,
        })
    }
}

/// A validated finalize submission, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewFinalizedOrder {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub items: Vec<CartLine>,
    pub total: Decimal,
}

impl NewFinalizedOrder {
    /// Check required fields before any persistence is attempted.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on the first missing or empty field.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_lines(&self.items, self.total)?;
        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("payment method", &self.payment_method),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }

    /// Build the row to insert, with the owner taken from the resolved
    /// identity.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the item sequence cannot be encoded.
    pub fn into_row(self, owner: &UserId) -> Result<Value, serde_json::Error> {
        Ok(json!({
            "user_id": owner,
            "name": self.name,
            "phone": self.phone,
            "address": self.address,
            "payment_method": self.payment_method,
            "notes": self.notes,
            "items": CartLine::encode_all(&self.items)?,
            "total": self.total,
        }))
    }
}

fn validate_lines(items: &[CartLine], total: Decimal) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::Validation("items must not be empty".to_owned()));
    }
    if items.iter().any(|line| line.quantity == 0) {
        return Err(ApiError::Validation(
            "item quantities must be greater than zero".to_owned(),
        ));
    }
    if total <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "total must be greater than zero".to_owned(),
        ));
    }
    Ok(())
}
