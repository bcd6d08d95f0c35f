//! Configuration schema for pkgstash
//!
//! Configuration is stored at `~/.config/pkgstash/config.toml`

use crate::cache::{CacheSettings, DEFAULT_RETENTION_LIMIT};
use crate::config::ConfigManager;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
    pub cache: CacheConfig,

    /// Artifact source settings
    pub source: SourceConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Keep artifacts between runs (default: true)
    pub enabled: bool,

    /// Cache root (default: platform cache dir)
    pub dir: Option<PathBuf>,

    /// Maximum number of distinct packages kept
    pub retention_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            retention_limit: DEFAULT_RETENTION_LIMIT.get(),
        }
    }
}

impl CacheConfig {
    /// Cache root in effect, or `None` when caching is disabled
    pub fn root(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        Some(
            self.dir
                .clone()
                .unwrap_or_else(ConfigManager::default_cache_dir),
        )
    }

    /// Convert to construction-time cache settings
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            root: self.root(),
            retention_limit: NonZeroUsize::new(self.retention_limit)
                .unwrap_or(DEFAULT_RETENTION_LIMIT),
        }
    }
}

/// Where artifacts are fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL template with `{id}`, `{version}` and `{name}` placeholders
    pub url: Option<String>,

    /// Local mirror directory (takes precedence over `url`)
    pub dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            dir: None,
            timeout_secs: 60,
        }
    }
}
