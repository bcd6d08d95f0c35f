//! CLI command implementations

pub mod clear;
pub mod config;
pub mod delete;
pub mod download;
pub mod list;
pub mod prune;

pub use clear::execute as clear;
pub use config::execute as config;
pub use delete::execute as delete;
pub use download::execute as download;
pub use list::execute as list;
pub use prune::execute as prune;

use crate::cache::DownloadCache;
use crate::config::Config;
use crate::fetch::create_fetcher;
use crate::store::FsBlobStore;
use std::sync::Arc;

/// Build the cache described by the configuration
///
/// Starts the startup reconciliation when caching is enabled.
fn open_cache(config: &Config) -> DownloadCache {
    DownloadCache::new(
        config.cache.settings(),
        Arc::new(FsBlobStore::new()),
        create_fetcher(&config.source),
    )
}
