//! Local caching module for offline data access.
//!
//! This module provides the `SnapshotStore` trait and its file-backed
//! implementation for persisting the last-known-good menu snapshot.
//! The store holds a single entry under a fixed key; it is overwritten
//! on every successful live load and read back only when a live load
//! times out.

pub mod store;

pub use store::{CachedSnapshot, FileStore, MemoryStore, SnapshotStore};
