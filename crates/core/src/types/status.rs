//! Order status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a persisted order.
///
/// This backend only ever writes `Pending`; later transitions belong to the
/// fulfillment subsystem. The wire value `"pendente"` matches the stored
/// column contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Recorded at checkout, not yet picked up by fulfillment.
    #[default]
    #[serde(rename = "pendente")]
    Pending,
}

impl OrderStatus {
    /// The stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendente",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
