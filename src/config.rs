//! Configuration Management
//!
//! Handles persistent configuration storage for ttargets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the service URL
pub const URL_ENV_VAR: &str = "TTARGETS_URL";

/// Service URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:6543";

/// Route opened when nothing else is configured
pub const DEFAULT_ROUTE: &str = "targets";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Last opened route, e.g. `target 42`
    #[serde(default)]
    pub last_route: Option<String>,
    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            last_route: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            path: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ttargets").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                    Self::default()
                }),
                Err(e) => {
                    tracing::warn!("Failed to read config {:?}: {}", path, e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.path = Some(path.to_path_buf());
        config
    }

    /// Save configuration to the path it was loaded from
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {:?}", path))?;

        Ok(())
    }

    /// Get effective base URL (CLI > environment > config > default)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| std::env::var(URL_ENV_VAR).ok().filter(|v| !v.is_empty()))
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective start route (CLI > last route > default)
    pub fn effective_route(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.last_route.clone())
            .unwrap_or_else(|| DEFAULT_ROUTE.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Remember the last route and save
    pub fn set_last_route(&mut self, route: &str) -> Result<()> {
        if self.last_route.as_deref() == Some(route) {
            return Ok(());
        }
        self.last_route = Some(route.to_string());
        self.save()
    }
}
