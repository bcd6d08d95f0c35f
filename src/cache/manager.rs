//! Download cache manager
//!
//! Owns the cache root, hands out artifact locations, and prunes the root
//! back to retention policy once at startup. Every download waits for that
//! startup pass, so pruning never races with a freshly fetched artifact.

use crate::cache::identity::Identity;
use crate::cache::retention::{EvictionPlan, Verdict};
use crate::error::StashResult;
use crate::fetch::{ArtifactFetcher, OperationContext};
use crate::store::BlobStore;
use futures_util::future::{self, join_all, BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info, trace};
use uuid::Uuid;

/// Retention limit used when none is configured
pub const DEFAULT_RETENTION_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Construction-time cache settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Persistent cache root; `None` disables caching
    pub root: Option<PathBuf>,
    /// Maximum number of distinct packages kept
    pub retention_limit: NonZeroUsize,
}

impl CacheSettings {
    /// Persistent cache rooted at `root`
    pub fn enabled(root: impl Into<PathBuf>, retention_limit: NonZeroUsize) -> Self {
        Self {
            root: Some(root.into()),
            retention_limit,
        }
    }

    /// Every artifact is a one-shot temporary file
    pub fn disabled() -> Self {
        Self {
            root: None,
            retention_limit: DEFAULT_RETENTION_LIMIT,
        }
    }
}

/// Whether artifacts persist between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Persistent, bounded cache
    Enabled { retention_limit: NonZeroUsize },
    /// Unique temporary file per download
    Disabled,
}

impl CacheMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Maximum packages retained (0 when disabled)
    pub fn retention_limit(&self) -> usize {
        match self {
            Self::Enabled { retention_limit } => retention_limit.get(),
            Self::Disabled => 0,
        }
    }
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Entries found under the root
    pub scanned: usize,
    /// Entries whose names are not cache artifacts
    pub unrecognized: usize,
    /// Older versions of a cached package
    pub outdated: usize,
    /// Packages beyond the retention limit
    pub excess: usize,
    /// Marked entries removed
    pub deleted: usize,
    /// Marked entries that could not be removed
    pub failed: usize,
}

impl ReconcileReport {
    /// Entries the retention plan marked for deletion
    pub fn marked(&self) -> usize {
        self.unrecognized + self.outdated + self.excess
    }
}

/// Bounded on-disk cache of package artifacts
pub struct DownloadCache {
    root: PathBuf,
    mode: CacheMode,
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn ArtifactFetcher>,
    reconciled: Shared<BoxFuture<'static, ReconcileReport>>,
}

impl DownloadCache {
    /// Create the cache and start its startup reconciliation
    ///
    /// With a configured root, the reconciliation pass is spawned on the
    /// current tokio runtime. Outside a runtime it is deferred until the
    /// first download or [`ready`](Self::ready) awaits it.
    pub fn new(
        settings: CacheSettings,
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn ArtifactFetcher>,
    ) -> Self {
        let Some(root) = settings.root else {
            debug!("Caching disabled, artifacts go to the temp directory");
            return Self {
                root: std::env::temp_dir(),
                mode: CacheMode::Disabled,
                store,
                fetcher,
                reconciled: future::ready(ReconcileReport::default()).boxed().shared(),
            };
        };

        let limit = settings.retention_limit;
        let pass = {
            let store = Arc::clone(&store);
            let root = root.clone();
            async move { reconcile(&*store, &root, limit.get()).await }
        };

        let reconciled = match Handle::try_current() {
            Ok(handle) => {
                let task = handle.spawn(pass);
                async move {
                    match task.await {
                        Ok(report) => report,
                        Err(e) => {
                            error!("Cache reconciliation task failed: {}", e);
                            ReconcileReport::default()
                        }
                    }
                }
                .boxed()
                .shared()
            }
            Err(_) => {
                debug!("No tokio runtime yet, reconciliation runs on first use");
                pass.boxed().shared()
            }
        };

        Self {
            root,
            mode: CacheMode::Enabled {
                retention_limit: limit,
            },
            store,
            fetcher,
            reconciled,
        }
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache mode fixed at construction
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Wait for the startup reconciliation and return its report
    pub async fn ready(&self) -> ReconcileReport {
        self.reconciled.clone().await
    }

    /// Return a local location holding the artifact for `identity`
    ///
    /// Fetches only when nothing exists at the cache location yet. Store and
    /// fetcher errors are returned as-is.
    pub async fn download_artifact(
        &self,
        identity: &Identity,
        ctx: &OperationContext,
    ) -> StashResult<PathBuf> {
        self.reconciled.clone().await;

        let location = self.root.join(self.name_for(identity));

        if self.store.exists(&location).await? {
            debug!(operation = %ctx.id, "Cache hit for {}", identity);
        } else {
            debug!(
                operation = %ctx.id,
                "Cache miss for {}, fetching from {}",
                identity,
                self.fetcher.source_name()
            );
            self.fetcher.fetch(identity, &location, ctx).await?;
        }

        Ok(location)
    }

    /// Release an artifact returned by [`download_artifact`](Self::download_artifact)
    ///
    /// Deletes immediately when caching is disabled. With caching enabled
    /// the entry stays until retention policy evicts it.
    pub async fn delete_artifact(&self, location: &Path) -> StashResult<()> {
        match self.mode {
            CacheMode::Disabled => {
                self.store.delete(location).await?;
                debug!("Deleted temporary artifact {}", location.display());
            }
            CacheMode::Enabled { .. } => {
                trace!("Keeping cached artifact {}", location.display());
            }
        }
        Ok(())
    }

    fn name_for(&self, identity: &Identity) -> String {
        match self.mode {
            CacheMode::Enabled { .. } => identity.file_name(),
            CacheMode::Disabled => Uuid::new_v4().to_string(),
        }
    }
}

/// Prune `root` back to retention policy
///
/// Never fails: problems are logged and reflected in the report.
pub async fn reconcile(store: &dyn BlobStore, root: &Path, retention_limit: usize) -> ReconcileReport {
    match try_reconcile(store, root, retention_limit).await {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to reconcile cache at {}: {}", root.display(), e);
            ReconcileReport::default()
        }
    }
}

async fn try_reconcile(
    store: &dyn BlobStore,
    root: &Path,
    retention_limit: usize,
) -> StashResult<ReconcileReport> {
    if !store.exists(root).await? {
        trace!("Cache root {} does not exist, nothing to prune", root.display());
        return Ok(ReconcileReport::default());
    }

    let listing = store.resolve(root).await?;
    let plan = EvictionPlan::new(listing, retention_limit);

    let mut report = ReconcileReport {
        scanned: plan.entries.len(),
        unrecognized: plan.count(Verdict::Unrecognized),
        outdated: plan.count(Verdict::Outdated),
        excess: plan.count(Verdict::Excess),
        ..ReconcileReport::default()
    };

    let deletions = plan.marked().map(|planned| async move {
        let result = store.delete(&planned.entry.location).await;
        (planned, result)
    });

    for (planned, result) in join_all(deletions).await {
        match result {
            Ok(()) => {
                debug!("Evicted {} entry {}", planned.verdict, planned.entry.name);
                report.deleted += 1;
            }
            Err(e) => {
                error!("Failed to evict {}: {}", planned.entry.location.display(), e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Reconciled cache at {}: {} scanned, {} evicted, {} failed",
        root.display(),
        report.scanned,
        report.deleted,
        report.failed
    );
    Ok(report)
}
