//! Realtime-database client module.
//!
//! This module provides the `MenuApiClient` for reading menu collections
//! from the managed realtime database over its REST surface:
//!
//! - one-shot `GET {path}.json` reads for snapshots and the static fallback
//! - long-lived `text/event-stream` subscriptions that deliver full
//!   replacement snapshots whenever a collection changes
//!
//! The database is read-only from this client's perspective.

pub mod client;
pub mod error;
pub mod stream;

pub use client::MenuApiClient;
pub use error::ApiError;
