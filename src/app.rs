//! Application state management for menucache.
//!
//! This module contains the core `App` struct that manages all
//! application state: the displayed menu snapshot and its provenance,
//! tab/selection state, the transient toast notice, the local cart, and
//! the channel to the background loader task.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::MenuApiClient;
use crate::cache::{FileStore, MemoryStore, SnapshotStore};
use crate::config::Config;
use crate::loader::{DataSource, LoaderEvent, LoaderPolicy, MenuLoader};
use crate::models::{Cart, Item, MenuSnapshot};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the loader event channel.
/// One resolve plus occasional live updates needs little headroom.
const EVENTS_CHANNEL_BUFFER: usize = 8;

/// How long a success toast stays visible.
const TOAST_SUCCESS_SECS: u64 = 3;

/// How long degraded/error toasts stay visible. Slightly longer so the
/// "you are looking at stale data" message registers.
const TOAST_NOTICE_SECS: u64 = 4;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Which content pane is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Menu,
    Cart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Degraded,
    Error,
}

/// Transient user-visible notice shown in the status bar.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    expires_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        let secs = match kind {
            ToastKind::Success => TOAST_SUCCESS_SECS,
            ToastKind::Degraded | ToastKind::Error => TOAST_NOTICE_SECS,
        };
        Self {
            message: message.into(),
            kind,
            expires_at: Instant::now() + Duration::from_secs(secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,

    // Displayed data
    pub menu: MenuSnapshot,
    pub source: DataSource,
    /// Age of the displayed snapshot when it came from the cache.
    pub source_age: Option<String>,
    /// True until the loader's single resolve arrives.
    pub loading: bool,

    // UI state
    pub state: AppState,
    pub pane: Pane,
    /// Active tab: 0 is "All", 1.. are the renderable sections.
    pub tab_index: usize,
    pub item_selection: usize,
    pub toast: Option<Toast>,

    // Ordering (local-only)
    pub cart: Cart,
    pub cart_selection: usize,

    // Background loader channel
    events_rx: mpsc::Receiver<LoaderEvent>,
}

impl App {
    /// Create the app and spawn the background loader task.
    ///
    /// `no_cache` swaps the file-backed snapshot store for an in-memory
    /// one, forcing a fresh load sequence every run.
    pub fn new(config: Config, no_cache: bool) -> Result<Self> {
        let api = MenuApiClient::new(&config.database_url)?;

        let store: Box<dyn SnapshotStore> = if no_cache {
            Box::new(MemoryStore::new())
        } else {
            let cache_dir = config
                .cache_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("./cache"));
            Box::new(FileStore::new(cache_dir)?)
        };

        let policy: LoaderPolicy = config.loader_policy();
        info!(?policy, "Starting menu loader");
        let loader = MenuLoader::start(&api, store, policy);

        let (events_tx, events_rx) = mpsc::channel(EVENTS_CHANNEL_BUFFER);
        let static_source = config.static_menu_source.clone();
        tokio::spawn(async move {
            let fetch_api = api.clone();
            loader
                .run(events_tx, move || async move {
                    fetch_api.fetch_static_menu(static_source.as_deref()).await
                })
                .await;
        });

        Ok(Self {
            config,
            menu: MenuSnapshot::default(),
            source: DataSource::Empty,
            source_age: None,
            loading: true,
            state: AppState::Normal,
            pane: Pane::Menu,
            tab_index: 0,
            item_selection: 0,
            toast: None,
            cart: Cart::default(),
            cart_selection: 0,
            events_rx,
        })
    }

    // =========================================================================
    // Loader events
    // =========================================================================

    /// Drain pending loader events. Called from the main loop between
    /// input polls, like any other background task check.
    pub fn check_loader_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                LoaderEvent::Resolved(outcome) => {
                    info!(source = ?outcome.source, "Initial load resolved");
                    self.menu = outcome.menu;
                    self.source = outcome.source;
                    self.source_age = outcome.age;
                    self.loading = false;
                    self.toast = Some(Self::source_toast(self.source));
                    self.clamp_selection();
                }
                LoaderEvent::Updated(menu) => {
                    info!("Live update applied");
                    self.menu = menu;
                    self.source = DataSource::Live;
                    self.source_age = None;
                    self.clamp_selection();
                }
            }
        }
    }

    fn source_toast(source: DataSource) -> Toast {
        match source {
            DataSource::Live => Toast::new(ToastKind::Success, "Menu loaded from live database"),
            DataSource::Cache => Toast::new(
                ToastKind::Degraded,
                "Weak connection - showing last saved copy",
            ),
            DataSource::Static => Toast::new(ToastKind::Degraded, "Loaded bundled backup menu"),
            DataSource::Empty => {
                Toast::new(ToastKind::Error, "Menu unavailable - check connection")
            }
        }
    }

    /// Per-frame housekeeping: expire the toast.
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    // =========================================================================
    // Tabs and selection
    // =========================================================================

    /// Tab titles: "All" plus each renderable section.
    pub fn tab_titles(&self) -> Vec<String> {
        let mut titles = vec!["All".to_string()];
        titles.extend(
            self.menu
                .sections()
                .iter()
                .map(|(cat, _)| cat.name.clone()),
        );
        titles
    }

    fn tab_count(&self) -> usize {
        1 + self.menu.sections().len()
    }

    pub fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % self.tab_count();
        self.item_selection = 0;
    }

    pub fn prev_tab(&mut self) {
        let count = self.tab_count();
        self.tab_index = (self.tab_index + count - 1) % count;
        self.item_selection = 0;
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tab_count() {
            self.tab_index = index;
            self.item_selection = 0;
        }
    }

    /// Items visible in the active tab, in render order. The "All" tab
    /// flattens every section (featured items first when present);
    /// category tabs show their own section.
    pub fn items_in_view(&self) -> Vec<&Item> {
        let sections = self.menu.sections();
        if self.tab_index == 0 {
            let mut items: Vec<&Item> = self.menu.featured_items();
            for (_, section_items) in &sections {
                items.extend(
                    section_items
                        .iter()
                        .copied()
                        .filter(|i| !(i.featured && i.visible)),
                );
            }
            items
        } else {
            sections
                .get(self.tab_index - 1)
                .map(|(_, items)| items.clone())
                .unwrap_or_default()
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items_in_view().get(self.item_selection).copied()
    }

    pub fn move_selection_up(&mut self) {
        match self.pane {
            Pane::Menu => self.item_selection = self.item_selection.saturating_sub(1),
            Pane::Cart => self.cart_selection = self.cart_selection.saturating_sub(1),
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.pane {
            Pane::Menu => {
                let max = self.items_in_view().len().saturating_sub(1);
                self.item_selection = (self.item_selection + 1).min(max);
            }
            Pane::Cart => {
                let max = self.cart.lines.len().saturating_sub(1);
                self.cart_selection = (self.cart_selection + 1).min(max);
            }
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.tab_count();
        if self.tab_index >= count {
            self.tab_index = 0;
        }
        let items = self.items_in_view().len();
        if self.item_selection >= items {
            self.item_selection = items.saturating_sub(1);
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add the selected menu item to the cart at its base price tier.
    pub fn add_selected_to_cart(&mut self) {
        if !self.menu.order_system {
            self.toast = Some(Toast::new(ToastKind::Error, "Ordering is disabled"));
            return;
        }

        let Some(item) = self.selected_item().cloned() else {
            return;
        };
        if !item.visible {
            self.toast = Some(Toast::new(
                ToastKind::Error,
                format!("{} is currently unavailable", item.name),
            ));
            return;
        }

        let tiers = item.price.tiers();
        let Some(tier) = tiers.first() else {
            warn!(item = %item.id, "Item has no price, not adding to cart");
            return;
        };

        self.cart.add(&item, tier);
        self.toast = Some(Toast::new(
            ToastKind::Success,
            format!("Added {} to order", item.name),
        ));
    }

    pub fn remove_selected_cart_line(&mut self) {
        self.cart.remove(self.cart_selection);
        let max = self.cart.lines.len().saturating_sub(1);
        self.cart_selection = self.cart_selection.min(max);
    }

    pub fn toggle_cart(&mut self) {
        if !self.menu.order_system {
            self.toast = Some(Toast::new(ToastKind::Error, "Ordering is disabled"));
            return;
        }
        self.pane = match self.pane {
            Pane::Menu => Pane::Cart,
            Pane::Cart => Pane::Menu,
        };
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::json;

    fn category(id: &str, order: i64) -> Category {
        Category {
            id: id.to_string(),
            name: format!("Cat {id}"),
            available: true,
            order,
            created_at: None,
        }
    }

    fn item(id: &str, category_id: &str, featured: bool, visible: bool) -> Item {
        let mut item: Item = serde_json::from_value(json!({
            "name": id,
            "price": "10, 14",
            "categoryId": category_id,
            "star": featured,
            "visible": visible,
        }))
        .unwrap();
        item.id = id.to_string();
        item
    }

    fn app_with_menu(menu: MenuSnapshot) -> App {
        let (_tx, events_rx) = mpsc::channel(1);
        App {
            config: Config::default(),
            menu,
            source: DataSource::Live,
            source_age: None,
            loading: false,
            state: AppState::Normal,
            pane: Pane::Menu,
            tab_index: 0,
            item_selection: 0,
            toast: None,
            cart: Cart::default(),
            cart_selection: 0,
            events_rx,
        }
    }

    fn sample_menu(order_system: bool) -> MenuSnapshot {
        MenuSnapshot::new(
            vec![category("c2", 2), category("c1", 1)],
            vec![
                item("tea", "c1", false, true),
                item("kunafa", "c2", true, true),
                item("ghost", "missing", false, true),
                item("off", "c1", false, false),
            ],
            order_system,
        )
    }

    #[test]
    fn test_tab_titles_follow_sort_order() {
        let app = app_with_menu(sample_menu(true));
        assert_eq!(app.tab_titles(), vec!["All", "Cat c1", "Cat c2"]);
    }

    #[test]
    fn test_all_view_excludes_orphans_and_leads_with_featured() {
        let app = app_with_menu(sample_menu(true));
        let ids: Vec<&str> = app.items_in_view().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["kunafa", "tea", "off"]);
    }

    #[test]
    fn test_featured_orphan_never_leads_all_view() {
        let menu = MenuSnapshot::new(
            vec![category("c1", 1)],
            vec![
                item("tea", "c1", false, true),
                item("ghost", "deleted-category", true, true),
            ],
            true,
        );
        let app = app_with_menu(menu);
        let ids: Vec<&str> = app.items_in_view().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tea"]);
    }

    #[test]
    fn test_tab_wrapping() {
        let mut app = app_with_menu(sample_menu(true));
        app.prev_tab();
        assert_eq!(app.tab_index, 2);
        app.next_tab();
        assert_eq!(app.tab_index, 0);
    }

    #[test]
    fn test_add_to_cart_disabled_by_flag() {
        let mut app = app_with_menu(sample_menu(false));
        app.add_selected_to_cart();
        assert!(app.cart.is_empty());
        assert!(matches!(
            app.toast.as_ref().map(|t| t.kind),
            Some(ToastKind::Error)
        ));
    }

    #[test]
    fn test_add_to_cart_uses_base_tier() {
        let mut app = app_with_menu(sample_menu(true));
        app.add_selected_to_cart();
        assert_eq!(app.cart.lines.len(), 1);
        assert_eq!(app.cart.lines[0].tier, "10");
        assert!(matches!(
            app.toast.as_ref().map(|t| t.kind),
            Some(ToastKind::Success)
        ));
    }

    #[test]
    fn test_add_unavailable_item_rejected() {
        let mut app = app_with_menu(sample_menu(true));
        // "off" is the last row of the All view.
        app.item_selection = app.items_in_view().len() - 1;
        app.add_selected_to_cart();
        assert!(app.cart.is_empty());
    }

    #[test]
    fn test_selection_clamped_when_menu_shrinks() {
        let mut app = app_with_menu(sample_menu(true));
        app.tab_index = 2;
        app.item_selection = 5;
        app.menu = MenuSnapshot::new(
            vec![category("c1", 1)],
            vec![item("tea", "c1", false, true)],
            true,
        );
        app.clamp_selection();
        assert_eq!(app.tab_index, 0);
        assert_eq!(app.item_selection, 0);
    }
}
