//! Incremental parser for the realtime database event-stream protocol.
//!
//! The database's streaming REST endpoint speaks server-sent events. Each
//! frame is an `event:` line followed by one or more `data:` lines and a
//! blank terminator. Data events (`put`, `patch`) carry a JSON payload of
//! the form `{"path": "/...", "data": ...}`; `keep-alive` frames arrive
//! every ~30s with a null payload; `cancel` and `auth_revoked` signal that
//! the connection must be reopened.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// One decoded frame from the event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Full value written at `path` (path "/" means the whole collection).
    Put { path: String, data: Value },
    /// Partial children update at `path`.
    Patch { path: String, data: Value },
    KeepAlive,
    /// Server cancelled the stream (e.g. rules change); reconnect.
    Cancel,
    /// Credentials no longer valid; reconnect.
    AuthRevoked,
}

#[derive(Debug, Deserialize)]
struct DataPayload {
    #[serde(default = "root_path")]
    path: String,
    #[serde(default)]
    data: Value,
}

fn root_path() -> String {
    "/".to_string()
}

/// Accumulates raw body bytes and yields complete `StreamEvent`s.
///
/// Handles frames split across chunk boundaries and multi-line `data:`
/// fields. The buffer holds raw bytes and decoding happens per complete
/// line, so a multi-byte character split across two network chunks is
/// reassembled intact. Unknown event names and unparseable payloads are
/// skipped with a debug log rather than failing the stream.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event_name: Option<String>,
    data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of body bytes, returning any frames completed by it.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            if let Some(event) = self.push_line(line.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }
        events
    }

    fn push_line(&mut self, line: &str) -> Option<StreamEvent> {
        if line.is_empty() {
            return self.finish_frame();
        }
        if let Some(name) = line.strip_prefix("event:") {
            self.event_name = Some(name.trim().to_string());
        } else if let Some(data) = line.strip_prefix("data:") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(data.trim_start());
        }
        // Comment lines (":...") and unknown fields are ignored.
        None
    }

    fn finish_frame(&mut self) -> Option<StreamEvent> {
        let name = self.event_name.take()?;
        let data = std::mem::take(&mut self.data);

        match name.as_str() {
            "put" | "patch" => {
                let payload: DataPayload = match serde_json::from_str(&data) {
                    Ok(p) => p,
                    Err(e) => {
                        debug!(event = %name, error = %e, "Skipping unparseable stream payload");
                        return None;
                    }
                };
                if name == "put" {
                    Some(StreamEvent::Put {
                        path: payload.path,
                        data: payload.data,
                    })
                } else {
                    Some(StreamEvent::Patch {
                        path: payload.path,
                        data: payload.data,
                    })
                }
            }
            "keep-alive" => Some(StreamEvent::KeepAlive),
            "cancel" => Some(StreamEvent::Cancel),
            "auth_revoked" => Some(StreamEvent::AuthRevoked),
            other => {
                debug!(event = %other, "Ignoring unknown stream event");
                None
            }
        }
    }
}
