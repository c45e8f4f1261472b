use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MenuSnapshot;

/// Fixed key under which the snapshot is stored.
const CACHE_KEY: &str = "menu_cache";

/// A menu snapshot together with the time it was captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub menu: MenuSnapshot,
    pub saved_at: DateTime<Utc>,
}

impl CachedSnapshot {
    pub fn new(menu: MenuSnapshot) -> Self {
        Self {
            menu,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages).
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Key-value collaborator for snapshot persistence, injected into the
/// loader so it can be exercised without a real filesystem. The loader
/// task holds it across await points, so implementors must be Sync.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<CachedSnapshot>>;
    fn save(&self, menu: &MenuSnapshot) -> Result<()>;
}

/// File-backed store: one JSON document under the cache directory.
/// Last writer wins; there is only ever one key.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", CACHE_KEY))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<CachedSnapshot>> {
        let path = self.cache_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

        let cached: CachedSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", path.display()))?;

        Ok(Some(cached))
    }

    fn save(&self, menu: &MenuSnapshot) -> Result<()> {
        let cached = CachedSnapshot::new(menu.clone());
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(), contents)?;
        Ok(())
    }
}

/// In-memory store for tests and the `--no-cache` escape hatch.
pub struct MemoryStore {
    inner: Mutex<Option<CachedSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    pub fn with_snapshot(menu: MenuSnapshot) -> Self {
        Self {
            inner: Mutex::new(Some(CachedSnapshot::new(menu))),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<CachedSnapshot>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Store lock poisoned"))?
            .clone())
    }

    fn save(&self, menu: &MenuSnapshot) -> Result<()> {
        *self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Store lock poisoned"))? =
            Some(CachedSnapshot::new(menu.clone()));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Item};
    use chrono::Duration;
    use serde_json::json;

    fn sample_menu() -> MenuSnapshot {
        let categories: Vec<Category> = vec![serde_json::from_value(json!({
            "name": "Drinks", "order": 1
        }))
        .unwrap()];
        let items: Vec<Item> = vec![serde_json::from_value(json!({
            "name": "Tea", "price": "7, 9", "categoryId": "c1", "star": true
        }))
        .unwrap()];
        MenuSnapshot::new(categories, items, false)
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        assert!(store.load().unwrap().is_none());

        let menu = sample_menu();
        store.save(&menu).unwrap();

        let cached = store.load().unwrap().unwrap();
        assert_eq!(cached.menu.categories.len(), 1);
        assert_eq!(cached.menu.categories[0].name, "Drinks");
        assert_eq!(cached.menu.items[0].price.tiers(), vec!["7", "9"]);
        assert!(cached.menu.items[0].featured);
        assert!(!cached.menu.order_system);
    }

    #[test]
    fn test_file_store_overwrites_single_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.save(&sample_menu()).unwrap();
        store.save(&MenuSnapshot::default()).unwrap();

        let cached = store.load().unwrap().unwrap();
        assert!(cached.menu.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_age_display() {
        let mut cached = CachedSnapshot::new(MenuSnapshot::default());
        assert_eq!(cached.age_display(), "just now");

        cached.saved_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.saved_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");

        cached.saved_at = Utc::now() + Duration::minutes(10);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_store_usable_across_tasks() {
        // The loader moves its boxed store into a spawned task and holds
        // it across await points.
        fn assert_bounds<T: Send + Sync + ?Sized>() {}
        assert_bounds::<dyn SnapshotStore>();
        assert_bounds::<FileStore>();
        assert_bounds::<MemoryStore>();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_menu()).unwrap();
        assert_eq!(store.load().unwrap().unwrap().menu.items.len(), 1);
    }
}
