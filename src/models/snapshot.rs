//! Complete menu state, independent of where it came from.
//!
//! A `MenuSnapshot` built from the live subscriptions, the local cache,
//! or the bundled static document has identical field shapes, so the
//! rendering layer never branches on data provenance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Category, Item};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    /// Feature flag: cart/add-to-order controls vs read-only price display.
    pub order_system: bool,
}

impl MenuSnapshot {
    pub fn new(mut categories: Vec<Category>, items: Vec<Item>, order_system: bool) -> Self {
        // Stable sort keeps database order for equal sort keys.
        categories.sort_by_key(|c| c.order);
        Self {
            categories,
            items,
            order_system,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.items.is_empty()
    }

    /// Available categories in display order.
    pub fn available_categories(&self) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.available).collect()
    }

    /// Items belonging to one category, in database order.
    pub fn items_for(&self, category_id: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .collect()
    }

    /// Renderable sections: available categories with at least one item,
    /// in ascending display order. Items whose category id matches no
    /// known category appear in no section.
    pub fn sections(&self) -> Vec<(&Category, Vec<&Item>)> {
        self.available_categories()
            .into_iter()
            .filter_map(|cat| {
                let items = self.items_for(&cat.id);
                if items.is_empty() {
                    None
                } else {
                    Some((cat, items))
                }
            })
            .collect()
    }

    /// Visible featured items, drawn only from renderable sections so an
    /// orphaned or hidden-category item can never surface through the
    /// featured lead.
    pub fn featured_items(&self) -> Vec<&Item> {
        self.sections()
            .into_iter()
            .flat_map(|(_, items)| items)
            .filter(|i| i.featured && i.visible)
            .collect()
    }

    pub fn has_featured(&self) -> bool {
        !self.featured_items().is_empty()
    }
}

/// Shape of the bundled static fallback document:
/// `{ categories: { id: {...} }, items: { id: {...} }, orderSystem?: bool }`.
#[derive(Debug, Deserialize)]
pub struct StaticMenuDoc {
    #[serde(default)]
    categories: Value,
    #[serde(default)]
    items: Value,
    #[serde(rename = "orderSystem", default)]
    order_system: Option<bool>,
}

impl StaticMenuDoc {
    pub fn into_snapshot(self) -> MenuSnapshot {
        MenuSnapshot::new(
            Category::decode_collection(self.categories),
            Item::decode_collection(self.items),
            self.order_system.unwrap_or(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category(id: &str, order: i64) -> Category {
        Category {
            id: id.to_string(),
            name: format!("Category {id}"),
            available: true,
            order,
            created_at: None,
        }
    }

    fn item(id: &str, category_id: &str) -> Item {
        serde_json::from_value(json!({ "name": id, "categoryId": category_id }))
            .map(|mut i: Item| {
                i.id = id.to_string();
                i
            })
            .unwrap()
    }

    #[test]
    fn test_sections_drop_orphaned_items() {
        let snapshot = MenuSnapshot::new(
            vec![category("drinks", 0)],
            vec![item("tea", "drinks"), item("ghost", "deleted-category")],
            true,
        );
        let sections = snapshot.sections();
        assert_eq!(sections.len(), 1);
        let all_items: Vec<&str> = sections
            .iter()
            .flat_map(|(_, items)| items.iter().map(|i| i.id.as_str()))
            .collect();
        assert!(all_items.contains(&"tea"));
        assert!(!all_items.contains(&"ghost"));
    }

    #[test]
    fn test_sections_ordered_by_sort_order() {
        let snapshot = MenuSnapshot::new(
            vec![category("c3", 3), category("c1", 1), category("c2", 2)],
            vec![item("a", "c1"), item("b", "c2"), item("c", "c3")],
            true,
        );
        let orders: Vec<i64> = snapshot.sections().iter().map(|(c, _)| c.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_sections_skip_unavailable_and_empty_categories() {
        let mut hidden = category("hidden", 0);
        hidden.available = false;
        let snapshot = MenuSnapshot::new(
            vec![hidden, category("empty", 1), category("drinks", 2)],
            vec![item("tea", "drinks"), item("off", "hidden")],
            true,
        );
        let sections = snapshot.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0.id, "drinks");
    }

    #[test]
    fn test_static_doc_into_snapshot() {
        let doc: StaticMenuDoc = serde_json::from_value(json!({
            "categories": { "c1": { "name": "Drinks", "order": 1 } },
            "items": { "i1": { "name": "Tea", "price": 8, "categoryId": "c1" } },
        }))
        .unwrap();
        let snapshot = doc.into_snapshot();
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.items.len(), 1);
        // Missing orderSystem defaults to enabled.
        assert!(snapshot.order_system);
    }

    #[test]
    fn test_featured_items_exclude_orphans_and_hidden_categories() {
        let mut disabled = category("disabled", 1);
        disabled.available = false;

        let mut ghost = item("ghost", "deleted-category");
        ghost.featured = true;
        let mut shelved = item("shelved", "disabled");
        shelved.featured = true;
        let mut kunafa = item("kunafa", "sweets");
        kunafa.featured = true;

        let snapshot = MenuSnapshot::new(
            vec![category("sweets", 0), disabled],
            vec![ghost, shelved, kunafa],
            true,
        );
        let featured: Vec<&str> = snapshot
            .featured_items()
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(featured, vec!["kunafa"]);
    }

    #[test]
    fn test_has_featured_ignores_hidden_items() {
        let mut starred = item("kunafa", "c1");
        starred.featured = true;
        starred.visible = false;
        let snapshot = MenuSnapshot::new(vec![category("c1", 0)], vec![starred], true);
        assert!(!snapshot.has_featured());
    }
}
