//! Client for the managed realtime database's REST surface.
//!
//! One-shot reads use `GET {base}/{path}.json`. Subscriptions open the
//! same path with `Accept: text/event-stream` and forward full
//! replacement snapshots of the collection into an mpsc channel; partial
//! child updates trigger a full refetch so subscribers always observe
//! whole-collection values, never diffs.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::{header, Client};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::stream::{SseParser, StreamEvent};
use super::ApiError;
use crate::models::StaticMenuDoc;

// ============================================================================
// Constants
// ============================================================================

/// Database path for the categories collection
pub const CATEGORIES_PATH: &str = "categories";

/// Database path for the items collection
pub const ITEMS_PATH: &str = "items";

/// Database path for the order-system feature flag
pub const ORDER_SYSTEM_PATH: &str = "settings/orderSystem";

/// HTTP request timeout for one-shot reads, in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connect timeout for the streaming client, which must not carry a
/// whole-request timeout (the stream stays open for the view's lifetime).
const STREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Initial backoff delay in milliseconds when a subscription drops.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Cap for the exponential reconnect backoff.
const MAX_BACKOFF_MS: u64 = 30_000;

/// Buffer size for per-subscription snapshot channels.
/// Snapshots are full replacements, so a small buffer is plenty.
const SUBSCRIPTION_BUFFER: usize = 8;

/// Last-resort menu document compiled into the binary.
const BUNDLED_MENU: &str = include_str!("../../assets/menu.json");

/// Client for the realtime database.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct MenuApiClient {
    client: Client,
    stream_client: Client,
    base_url: String,
}

impl MenuApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let stream_client = Client::builder()
            .connect_timeout(Duration::from_secs(STREAM_CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            stream_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn path_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// One-shot read of the raw JSON value at `path`.
    pub async fn fetch_value(&self, path: &str) -> Result<Value> {
        let url = self.path_url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        let value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;
        Ok(value)
    }

    pub async fn fetch_categories(&self) -> Result<Value> {
        self.fetch_value(CATEGORIES_PATH).await
    }

    pub async fn fetch_items(&self) -> Result<Value> {
        self.fetch_value(ITEMS_PATH).await
    }

    /// The order-system flag; a null value means "enabled".
    pub async fn fetch_order_system(&self) -> Result<bool> {
        let value = self.fetch_value(ORDER_SYSTEM_PATH).await?;
        Ok(value.as_bool().unwrap_or(true))
    }

    // ========================================================================
    // Static fallback
    // ========================================================================

    /// Load the static fallback document from `source` (an https URL or a
    /// local file path), or from the snapshot bundled into the binary when
    /// no source is configured.
    pub async fn fetch_static_menu(&self, source: Option<&str>) -> Result<crate::models::MenuSnapshot> {
        let text = match source {
            None => BUNDLED_MENU.to_string(),
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                let response = self
                    .client
                    .get(s)
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch static menu from {}", s))?;
                Self::check_response(response).await?.text().await?
            }
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read static menu file: {}", path))?,
        };

        let doc: StaticMenuDoc =
            serde_json::from_str(&text).context("Failed to parse static menu document")?;
        Ok(doc.into_snapshot())
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to the value at `path`. The returned receiver yields the
    /// full current value on connect and a full replacement value after
    /// every remote change; it never yields diffs. The subscription
    /// reconnects with exponential backoff until the receiver is dropped.
    pub fn subscribe(&self, path: &str) -> mpsc::Receiver<Value> {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let client = self.clone();
        let path = path.to_string();

        tokio::spawn(async move {
            client.run_subscription(&path, tx).await;
        });

        rx
    }

    async fn run_subscription(&self, path: &str, tx: mpsc::Sender<Value>) {
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            match self.stream_once(path, &tx).await {
                Ok(()) => {
                    // Clean disconnect (server cancel or stream end).
                    backoff_ms = INITIAL_BACKOFF_MS;
                }
                Err(e) => {
                    warn!(path, error = %e, "Subscription stream failed");
                }
            }

            if tx.is_closed() {
                debug!(path, "Subscription receiver dropped, stopping");
                return;
            }

            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
        }
    }

    /// Open one streaming connection and forward snapshots until it ends.
    async fn stream_once(&self, path: &str, tx: &mpsc::Sender<Value>) -> Result<()> {
        let url = self.path_url(path);
        let response = self
            .stream_client
            .get(&url)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await
            .with_context(|| format!("Failed to open event stream to {}", url))?;

        let response = Self::check_response(response).await?;
        debug!(path, "Event stream connected");

        let mut body = response.bytes_stream();
        let mut parser = SseParser::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.context("Event stream read failed")?;
            for event in parser.push_bytes(&chunk) {
                match event {
                    StreamEvent::Put { path: p, data } if p == "/" => {
                        if tx.send(data).await.is_err() {
                            return Ok(());
                        }
                    }
                    StreamEvent::Put { .. } | StreamEvent::Patch { .. } => {
                        // Partial update: refetch so the subscriber still
                        // sees a full replacement snapshot.
                        let value = self.fetch_value(path).await?;
                        if tx.send(value).await.is_err() {
                            return Ok(());
                        }
                    }
                    StreamEvent::KeepAlive => {}
                    StreamEvent::Cancel | StreamEvent::AuthRevoked => {
                        debug!(path, "Stream cancelled by server");
                        return Ok(());
                    }
                }
            }
        }

        debug!(path, "Event stream ended");
        Ok(())
    }
}
