//! Application configuration
//!
//! Settings are layered: built-in defaults, then an optional `config.json`
//! (platform config directory, or an explicit path), then environment
//! variables and command-line flags. The access key is never compiled in.

use crate::error::{Result, SnapgridError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name used for the platform config directory
pub const APP_NAME: &str = "snapgrid";

/// File name looked up inside the config directory
pub const CONFIG_FILE: &str = "config.json";

/// Default photo-search API host
pub const DEFAULT_API_URL: &str = "https://api.unsplash.com";

/// The search API accepts at most this many results per page
pub const MAX_PER_PAGE: u32 = 30;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the search API
    pub api_url: String,
    /// API client credential, sent as `client_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Quiet period before a search is sent
    pub debounce_ms: u64,
    /// Results requested per page
    pub per_page: u32,
    /// Scroll offset above which the back-to-top button appears
    pub scroll_top_threshold: f32,
    /// Extra pixels of tolerance when detecting the bottom of the grid
    pub bottom_slack: f32,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Edge length of a grid tile
    pub tile_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_key: None,
            debounce_ms: 300,
            per_page: MAX_PER_PAGE,
            scroll_top_threshold: 100.0,
            bottom_slack: 1.0,
            request_timeout_secs: 20,
            tile_size: 220.0,
        }
    }
}

/// Values that override the file layer (flags or environment)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub access_key: Option<String>,
    pub debounce_ms: Option<u64>,
    pub per_page: Option<u32>,
}

impl AppConfig {
    /// Default location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)
            .map_err(|e| SnapgridError::Config(format!("{}: {}", path.display(), e)))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the full configuration stack
    pub fn load(explicit_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file_path = explicit_path.map(Path::to_path_buf).or_else(Self::default_path);
        let base = match &file_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(key) = overrides.access_key {
            self.access_key = Some(key);
        }
        if let Some(ms) = overrides.debounce_ms {
            self.debounce_ms = ms;
        }
        if let Some(n) = overrides.per_page {
            self.per_page = n;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(SnapgridError::Config("api_url must not be empty".into()));
        }
        if self.debounce_ms > 10_000 {
            return Err(SnapgridError::Config(format!(
                "debounce_ms must be at most 10000, got {}",
                self.debounce_ms
            )));
        }
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(SnapgridError::Config(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        if self.tile_size <= 0.0 {
            return Err(SnapgridError::Config("tile_size must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(SnapgridError::Config("request_timeout_secs must be at least 1".into()));
        }
        if self.scroll_top_threshold < 0.0 {
            return Err(SnapgridError::Config(format!(
                "scroll_top_threshold must not be negative, got {}",
                self.scroll_top_threshold
            )));
        }
        if self.bottom_slack < 0.0 {
            return Err(SnapgridError::Config(format!(
                "bottom_slack must not be negative, got {}",
                self.bottom_slack
            )));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Access key with blank values treated as absent
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Access key safe for display: first four characters only
    pub fn masked_access_key(&self) -> String {
        match self.access_key() {
            Some(key) => {
                let head: String = key.chars().take(4).collect();
                format!("{}****", head)
            }
            None => "(not set)".to_string(),
        }
    }
}
