use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode_keyed;

fn default_true() -> bool {
    true
}

/// A menu section, managed externally in the database and read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Collection key; filled in during decoding, not present in the record.
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Unavailable categories keep their data but get no tab or section.
    #[serde(default = "default_true")]
    pub available: bool,
    /// Display sort order, ascending. Missing order sorts first.
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<i64>,
}

impl Category {
    /// Decode the `categories` collection value into a Vec sorted by
    /// display order. The sort is stable, so ties keep database order.
    pub fn decode_collection(value: Value) -> Vec<Category> {
        let mut categories = decode_keyed(value, |c: &mut Category, id| c.id = id);
        categories.sort_by_key(|c| c.order);
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_missing_fields() {
        let cat: Category = serde_json::from_value(json!({ "name": "Drinks" })).unwrap();
        assert!(cat.available);
        assert_eq!(cat.order, 0);
        assert!(cat.created_at.is_none());
    }

    #[test]
    fn test_decode_collection_sorts_by_order() {
        let value = json!({
            "a": { "name": "Third", "order": 3 },
            "b": { "name": "First", "order": 1 },
            "c": { "name": "Second", "order": 2 },
        });
        let cats = Category::decode_collection(value);
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_available_false_round_trips() {
        let cat: Category =
            serde_json::from_value(json!({ "name": "Hidden", "available": false })).unwrap();
        assert!(!cat.available);
    }
}
