//! Application configuration management.
//!
//! Configuration is stored at `~/.config/menucache/config.json` and can
//! be overridden per-run with `MENUCACHE_*` environment variables (also
//! picked up from a `.env` file). A missing config file yields defaults;
//! a malformed one is an error.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::loader::{LoaderPolicy, DEFAULT_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "menucache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Connection parameters for the demo database this client ships against.
const DEFAULT_DATABASE_URL: &str =
    "https://akila-menu-default-rtdb.europe-west1.firebasedatabase.app";

/// Bounds for the configurable live-load timeout, in seconds. Below this
/// slow links never win the race; above it the splash overstays.
const MIN_TIMEOUT_SECS: u64 = 3;
const MAX_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    /// Static fallback document: https URL or local file path.
    /// None uses the snapshot bundled into the binary.
    pub static_menu_source: Option<String>,
    /// Live-load timeout for the startup race, in seconds.
    pub timeout_secs: u64,
    /// Skip the live attempt entirely.
    pub offline: bool,
    /// Whether live data arriving after a fallback was shown replaces it.
    pub live_overwrites_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            static_menu_source: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            offline: false,
            live_overwrites_fallback: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MENUCACHE_DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(source) = std::env::var("MENUCACHE_STATIC_MENU") {
            self.static_menu_source = Some(source);
        }
        if let Ok(secs) = std::env::var("MENUCACHE_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.timeout_secs = secs;
            }
        }
        if let Ok(offline) = std::env::var("MENUCACHE_OFFLINE") {
            self.offline = matches!(offline.as_str(), "1" | "true" | "yes");
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn loader_policy(&self) -> LoaderPolicy {
        let secs = self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        LoaderPolicy {
            timeout: Duration::from_secs(secs),
            offline: self.offline,
            live_overwrites_fallback: self.live_overwrites_fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.offline);
        assert!(config.live_overwrites_fallback);
        assert!(config.static_menu_source.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "timeout_secs": 12, "offline": true }"#).unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert!(config.offline);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_loader_policy_mapping() {
        let config = Config {
            timeout_secs: 3,
            offline: true,
            live_overwrites_fallback: false,
            ..Config::default()
        };
        let policy = config.loader_policy();
        assert_eq!(policy.timeout, Duration::from_secs(3));
        assert!(policy.offline);
        assert!(!policy.live_overwrites_fallback);
    }

    #[test]
    fn test_timeout_clamped_to_bounds() {
        let mut config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(
            config.loader_policy().timeout,
            Duration::from_secs(MIN_TIMEOUT_SECS)
        );

        config.timeout_secs = 600;
        assert_eq!(
            config.loader_policy().timeout,
            Duration::from_secs(MAX_TIMEOUT_SECS)
        );
    }
}
