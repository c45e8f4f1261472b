//! Data models for menu entities.
//!
//! This module contains the data structures used to represent
//! menu data from the realtime database:
//!
//! - `Category`: menu section with display ordering and availability
//! - `Item`: dish with price tiers, visibility and featured flags
//! - `MenuSnapshot`: complete menu state (categories + items + order flag)
//! - `Cart`, `CartLine`: local-only ordering state

pub mod cart;
pub mod category;
pub mod item;
pub mod snapshot;

pub use cart::{Cart, CartLine};
pub use category::Category;
pub use item::{Item, Price};
pub use snapshot::{MenuSnapshot, StaticMenuDoc};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode a `{ id: record }` realtime-database collection into a Vec.
///
/// The database stores collections as JSON objects keyed by push-id; the
/// records themselves do not carry their own key, so `assign` writes the
/// key back into each decoded record. Records that fail to deserialize
/// are dropped with a warning rather than failing the whole collection.
/// A `null` value (empty collection) decodes to an empty Vec.
pub fn decode_keyed<T, F>(value: Value, assign: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(&mut T, String),
{
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Vec::new(),
        other => {
            warn!(kind = %json_kind(&other), "Expected object for collection");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(map.len());
    for (id, raw) in map {
        match serde_json::from_value::<T>(raw) {
            Ok(mut record) => {
                assign(&mut record, id);
                records.push(record);
            }
            Err(e) => {
                warn!(record = %id, error = %e, "Dropping malformed record");
            }
        }
    }
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_keyed_null_is_empty() {
        let cats: Vec<Category> = decode_keyed(Value::Null, |c: &mut Category, id| c.id = id);
        assert!(cats.is_empty());
    }

    #[test]
    fn test_decode_keyed_assigns_ids() {
        let value = json!({
            "c1": { "name": "Drinks" },
            "c2": { "name": "Mains", "order": 2 },
        });
        let mut cats: Vec<Category> = decode_keyed(value, |c: &mut Category, id| c.id = id);
        cats.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].id, "c1");
        assert_eq!(cats[1].name, "Mains");
    }

    #[test]
    fn test_decode_keyed_drops_malformed() {
        let value = json!({
            "good": { "name": "Drinks" },
            "bad": { "order": "not-a-number" },
        });
        let cats: Vec<Category> = decode_keyed(value, |c: &mut Category, id| c.id = id);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].id, "good");
    }
}
