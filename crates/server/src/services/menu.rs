//! Menu reader.
//!
//! Fetches the full menu on every call - the menu is small and the catalog
//! system caches it externally, so there is no pagination or filtering here.

use std::collections::BTreeMap;
use std::sync::Arc;

use sabor_core::MenuItem;

use crate::backend::{RowsApi, SelectQuery, SortDir};
use crate::error::ApiError;

/// Table holding menu items, owned by the external catalog process.
const MENU_TABLE: &str = "menu_items";

/// Read-only access to the categorized menu.
#[derive(Clone)]
pub struct MenuService {
    rows: Arc<dyn RowsApi>,
}

impl MenuService {
    /// Create the service around an injected rows client.
    #[must_use]
    pub fn new(rows: Arc<dyn RowsApi>) -> Self {
        Self { rows }
    }

    /// The full menu grouped by category.
    ///
    /// # Errors
    ///
    /// `Persistence` if the store read fails, `DataIntegrity` if a stored
    /// menu row cannot be decoded.
    pub async fn grouped(&self) -> Result<BTreeMap<String, Vec<MenuItem>>, ApiError> {
        let rows = self
            .rows
            .select(MENU_TABLE, SelectQuery::new().order_by("id", SortDir::Asc))
            .await?;

        let items = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<MenuItem>, _>>()
            .map_err(|err| ApiError::DataIntegrity(format!("menu row could not be decoded: {err}")))?;

        Ok(group_by_category(items))
    }
}

/// Group items into category buckets.
///
/// Items are sorted by (category, id) first; that ordering is load-bearing -
/// it is what makes the per-category grouping deterministic and stable across
/// repeated calls. Items without a category land in the sentinel bucket.
fn group_by_category(mut items: Vec<MenuItem>) -> BTreeMap<String, Vec<MenuItem>> {
    items.sort_by(|a, b| {
        a.category_label()
            .cmp(b.category_label())
            .then(a.id.cmp(&b.id))
    });

    let mut grouped: BTreeMap<String, Vec<MenuItem>> = BTreeMap::new();
    for item in items {
        grouped
            .entry(item.category_label().to_owned())
            .or_default()
            .push(item);
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sabor_core::{ItemId, UNCATEGORIZED};
    use serde_json::json;

    fn item(id: i64, category: Option<&str>) -> MenuItem {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("item-{id}"),
            "price": "10.0",
            "category": category,
        }))
        .unwrap()
    }

    #[test]
    fn groups_by_category_with_sentinel_bucket() {
        let grouped = group_by_category(vec![
            item(1, Some("Bebidas")),
            item(2, None),
            item(3, Some("Bebidas")),
        ]);

        assert_eq!(grouped.len(), 2);
        let bebidas: Vec<i64> = grouped["Bebidas"].iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(bebidas, vec![1, 3]);
        let outros: Vec<i64> = grouped[UNCATEGORIZED]
            .iter()
            .map(|i| i.id.as_i64())
            .collect();
        assert_eq!(outros, vec![2]);
    }

    #[test]
    fn grouping_is_stable_regardless_of_input_order() {
        let forward = group_by_category(vec![
            item(1, Some("Bebidas")),
            item(3, Some("Bebidas")),
            item(2, Some("Pratos")),
        ]);
        let shuffled = group_by_category(vec![
            item(2, Some("Pratos")),
            item(3, Some("Bebidas")),
            item(1, Some("Bebidas")),
        ]);
        assert_eq!(forward, shuffled);
        assert_eq!(
            forward["Bebidas"].iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![ItemId::new(1), ItemId::new(3)]
        );
    }

    #[test]
    fn empty_menu_groups_to_empty_map() {
        assert!(group_by_category(vec![]).is_empty());
    }
}
