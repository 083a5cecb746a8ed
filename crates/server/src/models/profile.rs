//! Customer profile model.

use serde::Serialize;
use serde_json::{Value, json};

use sabor_core::{Email, UserId};

/// Profile row created exactly once, right after identity creation.
///
/// Keyed by the identity itself; never mutated or deleted by this backend.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
}

impl Profile {
    /// Build the row to insert.
    #[must_use]
    pub fn into_row(self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
        })
    }
}
