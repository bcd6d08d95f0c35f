//! Bounded on-disk cache of package artifacts
//!
//! Artifacts are keyed by package identity and stored as flat files under a
//! single cache root. File names are the only metadata:
//!
//! | Name | Meaning |
//! |------|---------|
//! | `tool-1.4.0` | Cached artifact for `tool@1.4.0` |
//! | `.tool-1.4.0.<uuid>.partial` | In-flight download (pruned if left behind) |
//! | anything else | Unrecognized, pruned at startup |
//!
//! # Retention
//!
//! At startup the cache keeps only the newest version of each package, and
//! only the first `retention_limit` packages in directory listing order.
//! Downloads wait until this pass has finished.

pub mod identity;
pub mod manager;
pub mod retention;

pub use identity::Identity;
pub use manager::{
    reconcile, CacheMode, CacheSettings, DownloadCache, ReconcileReport, DEFAULT_RETENTION_LIMIT,
};
pub use retention::{EvictionPlan, PlannedEntry, Verdict};
