use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode_keyed;
use crate::utils::format_amount;

fn default_true() -> bool {
    true
}

/// Item price as stored remotely: either a single number or a string of
/// comma-separated numbers representing size/price tiers ("12, 15, 18").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Default for Price {
    fn default() -> Self {
        Price::Number(0.0)
    }
}

impl Price {
    /// Split into display tiers, trimming whitespace around each value.
    pub fn tiers(&self) -> Vec<String> {
        match self {
            Price::Number(n) => vec![format_amount(*n)],
            Price::Text(s) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The first (base) tier as a number, for cart totals.
    pub fn base_amount(&self) -> Option<f64> {
        match self {
            Price::Number(n) => Some(*n),
            Price::Text(s) => s.split(',').next()?.trim().parse().ok(),
        }
    }
}

/// A dish on the menu, managed externally and read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Collection key; filled in during decoding.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Price,
    /// Optional takeaway price; values <= 0 mean "no takeaway price".
    #[serde(rename = "priceTw", default)]
    pub price_takeaway: Option<f64>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "categoryId", default)]
    pub category_id: String,
    /// False marks "currently unavailable" for display, not deletion.
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(rename = "star", default)]
    pub featured: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<i64>,
}

impl Item {
    pub fn decode_collection(value: Value) -> Vec<Item> {
        decode_keyed(value, |i: &mut Item, id| i.id = id)
    }

    pub fn takeaway_price(&self) -> Option<f64> {
        self.price_takeaway.filter(|p| *p > 0.0)
    }

    /// Joined price tiers for single-line display.
    pub fn price_display(&self) -> String {
        self.price.tiers().join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_accepts_number_and_string() {
        let n: Item = serde_json::from_value(json!({ "name": "Tea", "price": 8 })).unwrap();
        assert_eq!(n.price.tiers(), vec!["8"]);

        let s: Item =
            serde_json::from_value(json!({ "name": "Pizza", "price": "30, 40,55" })).unwrap();
        assert_eq!(s.price.tiers(), vec!["30", "40", "55"]);
    }

    #[test]
    fn test_price_base_amount() {
        assert_eq!(Price::Number(12.5).base_amount(), Some(12.5));
        assert_eq!(Price::Text("30, 40".into()).base_amount(), Some(30.0));
        assert_eq!(Price::Text("".into()).base_amount(), None);
    }

    #[test]
    fn test_item_defaults() {
        let item: Item = serde_json::from_value(json!({ "name": "Burger" })).unwrap();
        assert!(item.visible);
        assert!(!item.featured);
        assert!(item.takeaway_price().is_none());
        assert_eq!(item.category_id, "");
    }

    #[test]
    fn test_takeaway_price_ignores_zero() {
        let item: Item = serde_json::from_value(json!({
            "name": "Shawarma",
            "price": 25,
            "priceTw": 0,
        }))
        .unwrap();
        assert!(item.takeaway_price().is_none());

        let item: Item = serde_json::from_value(json!({
            "name": "Shawarma",
            "price": 25,
            "priceTw": 22,
        }))
        .unwrap();
        assert_eq!(item.takeaway_price(), Some(22.0));
    }

    #[test]
    fn test_featured_maps_from_star() {
        let item: Item =
            serde_json::from_value(json!({ "name": "Kunafa", "star": true })).unwrap();
        assert!(item.featured);
    }
}
