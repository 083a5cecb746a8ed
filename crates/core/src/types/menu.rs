//! Menu item type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// Category bucket for menu items that carry no category label.
///
/// The label is part of the public menu response shape and must not change.
pub const UNCATEGORIZED: &str = "Outros";

/// A single menu entry.
///
/// Menu rows are owned and mutated by an external catalog process; the
/// backend only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Row key assigned by the backing store.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Free-text category label; `None` groups under [`UNCATEGORIZED`].
    #[serde(default)]
    pub category: Option<String>,
    /// Optional image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// The category bucket this item belongs to.
    ///
    /// Missing and empty labels both fall back to [`UNCATEGORIZED`].
    #[must_use]
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => UNCATEGORIZED,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_label_falls_back_to_sentinel() {
        let mut item: MenuItem = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Agua",
            "price": "4.50"
        }))
        .unwrap();
        assert_eq!(item.category_label(), UNCATEGORIZED);

        item.category = Some(String::new());
        assert_eq!(item.category_label(), UNCATEGORIZED);

        item.category = Some("Bebidas".to_owned());
        assert_eq!(item.category_label(), "Bebidas");
    }

    #[test]
    fn deserializes_row_with_all_fields() {
        let item: MenuItem = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Feijoada",
            "description": "Serve duas pessoas",
            "price": "42.0",
            "category": "Pratos",
            "image_url": "https://cdn.example.com/feijoada.jpg"
        }))
        .unwrap();
        assert_eq!(item.id, ItemId::new(3));
        assert_eq!(item.category.as_deref(), Some("Pratos"));
    }
}
