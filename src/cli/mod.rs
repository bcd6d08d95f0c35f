//! Command-line interface for pkgstash

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::config::Config;
use std::path::PathBuf;

/// Apply the global cache flags on top of the loaded configuration
///
/// `--no-cache` wins over `--cache-dir`, so an exported
/// `PKGSTASH_CACHE_DIR` can still be bypassed for a single invocation.
pub fn apply_overrides(config: &mut Config, cache_dir: Option<PathBuf>, no_cache: bool) {
    if let Some(dir) = cache_dir {
        config.cache.dir = Some(dir);
        config.cache.enabled = true;
    }

    if no_cache {
        config.cache.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_override_enables_cache() {
        let mut config = Config::default();
        config.cache.enabled = false;

        apply_overrides(&mut config, Some(PathBuf::from("/tmp/stash")), false);

        assert!(config.cache.enabled);
        assert_eq!(config.cache.root(), Some(PathBuf::from("/tmp/stash")));
    }

    #[test]
    fn no_cache_wins_over_cache_dir() {
        let mut config = Config::default();

        apply_overrides(&mut config, Some(PathBuf::from("/tmp/stash")), true);

        assert!(!config.cache.enabled);
        assert_eq!(config.cache.root(), None);
    }

    #[test]
    fn no_overrides_keep_config() {
        let mut config = Config::default();
        config.cache.dir = Some(PathBuf::from("/var/cache/pkgstash"));

        apply_overrides(&mut config, None, false);

        assert!(config.cache.enabled);
        assert_eq!(config.cache.dir, Some(PathBuf::from("/var/cache/pkgstash")));
    }
}
