//! Menu data loader: obtain the current menu from whichever source is
//! available, with bounded latency.
//!
//! On startup the loader races three live subscriptions (categories,
//! items, order-system flag) against a one-shot fallback timer. The first
//! side to finish decides the initial outcome:
//!
//! - all three subscriptions delivered: persist the combined snapshot to
//!   the store and resolve `Live`;
//! - timer fired first: resolve from the store (`Cache`), else from the
//!   static document (`Static`), else with empty data (`Empty`).
//!
//! The subscriptions stay open afterwards; later deliveries keep updating
//! the displayed menu subject to the overwrite policy. The initial
//! resolve happens exactly once.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{client, MenuApiClient};
use crate::cache::SnapshotStore;
use crate::models::{Category, Item, MenuSnapshot};

// ============================================================================
// Constants
// ============================================================================

/// Default live-load timeout in seconds. The observed variants of this
/// system use 3-15s; 8s balances patience on weak links against a usable
/// first paint.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Buffer for the merged collection-update channel. Three producers that
/// each send full replacements need very little headroom.
const UPDATE_CHANNEL_BUFFER: usize = 16;

// ============================================================================
// Types
// ============================================================================

/// Where the currently displayed menu came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Cache,
    Static,
    Empty,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Cache => "cached copy",
            DataSource::Static => "bundled backup",
            DataSource::Empty => "unavailable",
        }
    }
}

/// The single initial result of a load sequence.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub menu: MenuSnapshot,
    pub source: DataSource,
    /// Human-readable snapshot age, present only for cached data.
    pub age: Option<String>,
}

/// One full-replacement delivery from a live subscription.
#[derive(Debug, Clone)]
pub enum CollectionUpdate {
    Categories(Vec<Category>),
    Items(Vec<Item>),
    OrderSystem(bool),
}

/// Events the loader task reports to the application.
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// The initial race resolved; emitted exactly once.
    Resolved(LoadOutcome),
    /// A later live delivery updated the menu (post-resolve).
    Updated(MenuSnapshot),
}

/// Tunable policy for the load sequence. The timeout duration and the
/// stale-overwrite behavior deliberately are parameters, not constants.
#[derive(Debug, Clone)]
pub struct LoaderPolicy {
    pub timeout: Duration,
    /// Skip the live attempt entirely and go straight to the fallback.
    pub offline: bool,
    /// Whether a live completion that arrives after a fallback was shown
    /// may overwrite the displayed data.
    pub live_overwrites_fallback: bool,
}

impl Default for LoaderPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            offline: false,
            live_overwrites_fallback: true,
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

pub struct MenuLoader {
    rx: mpsc::Receiver<CollectionUpdate>,
    store: Box<dyn SnapshotStore>,
    policy: LoaderPolicy,

    // Accumulated live state. Mutated only from the loader's own task, so
    // plain fields suffice - there is no parallel mutation, only
    // interleaved deliveries.
    categories: Vec<Category>,
    items: Vec<Item>,
    order_system: bool,
    categories_loaded: bool,
    items_loaded: bool,
    order_system_loaded: bool,

    resolved: Option<DataSource>,
}

impl MenuLoader {
    /// Start the three live subscriptions and return a loader wired to
    /// them. In offline mode no subscriptions are opened.
    pub fn start(api: &MenuApiClient, store: Box<dyn SnapshotStore>, policy: LoaderPolicy) -> Self {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_BUFFER);

        if !policy.offline {
            Self::forward(api.subscribe(client::CATEGORIES_PATH), tx.clone(), |v| {
                CollectionUpdate::Categories(Category::decode_collection(v))
            });
            Self::forward(api.subscribe(client::ITEMS_PATH), tx.clone(), |v| {
                CollectionUpdate::Items(Item::decode_collection(v))
            });
            Self::forward(api.subscribe(client::ORDER_SYSTEM_PATH), tx, |v| {
                CollectionUpdate::OrderSystem(v.as_bool().unwrap_or(true))
            });
        }

        Self::with_channel(rx, store, policy)
    }

    /// Build a loader around an externally fed channel. Used by `start`
    /// and directly by tests.
    pub fn with_channel(
        rx: mpsc::Receiver<CollectionUpdate>,
        store: Box<dyn SnapshotStore>,
        policy: LoaderPolicy,
    ) -> Self {
        Self {
            rx,
            store,
            policy,
            categories: Vec::new(),
            items: Vec::new(),
            order_system: true,
            categories_loaded: false,
            items_loaded: false,
            order_system_loaded: false,
            resolved: None,
        }
    }

    fn forward<F>(mut sub: mpsc::Receiver<Value>, tx: mpsc::Sender<CollectionUpdate>, map: F)
    where
        F: Fn(Value) -> CollectionUpdate + Send + 'static,
    {
        tokio::spawn(async move {
            while let Some(value) = sub.recv().await {
                if tx.send(map(value)).await.is_err() {
                    return;
                }
            }
        });
    }

    fn apply(&mut self, update: CollectionUpdate) {
        match update {
            CollectionUpdate::Categories(categories) => {
                self.categories = categories;
                self.categories_loaded = true;
            }
            CollectionUpdate::Items(items) => {
                self.items = items;
                self.items_loaded = true;
            }
            CollectionUpdate::OrderSystem(enabled) => {
                self.order_system = enabled;
                self.order_system_loaded = true;
            }
        }
    }

    fn all_loaded(&self) -> bool {
        self.categories_loaded && self.items_loaded && self.order_system_loaded
    }

    fn live_snapshot(&self) -> MenuSnapshot {
        MenuSnapshot::new(
            self.categories.clone(),
            self.items.clone(),
            self.order_system,
        )
    }

    /// Run the initial race. Returns exactly one outcome; dropping out of
    /// the select disarms the fallback timer on the live path and stops
    /// waiting for live data on the timeout path.
    pub async fn resolve<F, Fut>(&mut self, fetch_static: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MenuSnapshot>>,
    {
        if self.policy.offline {
            info!("Offline: skipping live attempt");
            let outcome = self.static_outcome(fetch_static).await;
            return self.finish(outcome);
        }

        let timer = tokio::time::sleep(self.policy.timeout);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                delivered = self.rx.recv() => match delivered {
                    Some(update) => {
                        self.apply(update);
                        if self.all_loaded() {
                            let menu = self.live_snapshot();
                            if let Err(e) = self.store.save(&menu) {
                                warn!(error = %e, "Failed to write snapshot cache");
                            }
                            info!(
                                categories = menu.categories.len(),
                                items = menu.items.len(),
                                "Live load complete"
                            );
                            return self.finish(LoadOutcome {
                                menu,
                                source: DataSource::Live,
                                age: None,
                            });
                        }
                    }
                    // All subscription tasks gone; same recovery as a timeout.
                    None => {
                        let outcome = self.fallback_outcome(fetch_static).await;
                        return self.finish(outcome);
                    }
                },
                _ = &mut timer => {
                    info!(timeout = ?self.policy.timeout, "Live load timed out");
                    let outcome = self.fallback_outcome(fetch_static).await;
                    return self.finish(outcome);
                }
            }
        }
    }

    fn finish(&mut self, outcome: LoadOutcome) -> LoadOutcome {
        self.resolved = Some(outcome.source);
        outcome
    }

    /// Timeout path: cache first, static document only on a cache miss.
    async fn fallback_outcome<F, Fut>(&self, fetch_static: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MenuSnapshot>>,
    {
        match self.store.load() {
            Ok(Some(cached)) => {
                let age = cached.age_display();
                info!(%age, "Using cached snapshot");
                LoadOutcome {
                    menu: cached.menu,
                    source: DataSource::Cache,
                    age: Some(age),
                }
            }
            Ok(None) => {
                debug!("No cached snapshot");
                self.static_outcome(fetch_static).await
            }
            Err(e) => {
                warn!(error = %e, "Cache read failed");
                self.static_outcome(fetch_static).await
            }
        }
    }

    async fn static_outcome<F, Fut>(&self, fetch_static: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MenuSnapshot>>,
    {
        match fetch_static().await {
            Ok(menu) => LoadOutcome {
                menu,
                source: DataSource::Static,
                age: None,
            },
            Err(e) => {
                // Never fatal: degrade to an empty view.
                warn!(error = %e, "Static fallback failed");
                LoadOutcome {
                    menu: MenuSnapshot::default(),
                    source: DataSource::Empty,
                    age: None,
                }
            }
        }
    }

    /// Whether post-resolve live deliveries may replace the shown data.
    fn exposes_updates(&self) -> bool {
        match self.resolved {
            Some(DataSource::Live) => true,
            Some(_) => self.policy.live_overwrites_fallback,
            None => false,
        }
    }

    /// Resolve once, then forward gated live updates for the lifetime of
    /// the view. Each full live completion is persisted to the store
    /// whether or not the policy lets it reach the display.
    pub async fn run<F, Fut>(mut self, events: mpsc::Sender<LoaderEvent>, fetch_static: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MenuSnapshot>>,
    {
        let outcome = self.resolve(fetch_static).await;
        if events.send(LoaderEvent::Resolved(outcome)).await.is_err() {
            return;
        }

        while let Some(update) = self.rx.recv().await {
            self.apply(update);
            if !self.all_loaded() {
                continue;
            }

            let menu = self.live_snapshot();
            if let Err(e) = self.store.save(&menu) {
                warn!(error = %e, "Failed to write snapshot cache");
            }

            if self.exposes_updates() {
                if events.send(LoaderEvent::Updated(menu)).await.is_err() {
                    return;
                }
            } else {
                debug!("Suppressing late live update per policy");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
