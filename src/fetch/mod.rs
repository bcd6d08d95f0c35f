//! Artifact fetchers
//!
//! A fetcher materializes the bytes of one package identity at a target
//! location. The cache decides *where*; the fetcher decides *how*:
//! - Local mirror directory (`DirectoryFetcher`)
//! - HTTP(S) URL template (`HttpFetcher`)
//! - No source at all (`OfflineFetcher`): only cache hits succeed
//!
//! The directory and HTTP fetchers write into a hidden staging file next to
//! the target and rename it into place, so the canonical name only ever
//! appears with complete content.

mod directory;
mod http;

pub use directory::DirectoryFetcher;
pub use http::HttpFetcher;

use crate::cache::Identity;
use crate::config::schema::SourceConfig;
use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Caller-supplied context carried through to the fetcher untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationContext {
    /// Unique id for correlating log lines
    pub id: Uuid,
    /// Human-readable description of the operation (e.g. "install")
    pub label: String,
}

impl OperationContext {
    /// Create a context with a fresh id
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }
}

/// Abstract artifact source
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Write the artifact for `identity` to `target`
    ///
    /// On success `target` exists.
    async fn fetch(
        &self,
        identity: &Identity,
        target: &Path,
        ctx: &OperationContext,
    ) -> StashResult<()>;

    /// Human-readable source name for display
    fn source_name(&self) -> &'static str;
}

/// Fetcher used when no source is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl ArtifactFetcher for OfflineFetcher {
    async fn fetch(
        &self,
        identity: &Identity,
        _target: &Path,
        ctx: &OperationContext,
    ) -> StashResult<()> {
        debug!(operation = %ctx.id, "No source configured for {}", identity);
        Err(StashError::SourceNotConfigured)
    }

    fn source_name(&self) -> &'static str {
        "offline"
    }
}

/// Create the fetcher described by the source configuration
///
/// A local mirror directory wins over a URL template when both are set.
pub fn create_fetcher(config: &SourceConfig) -> Arc<dyn ArtifactFetcher> {
    if let Some(dir) = &config.dir {
        return Arc::new(DirectoryFetcher::new(dir.clone()));
    }

    if let Some(url) = &config.url {
        return Arc::new(HttpFetcher::new(url.clone(), config.timeout_secs));
    }

    Arc::new(OfflineFetcher)
}

/// A hidden sibling file that becomes the target on commit
pub(crate) struct Staging {
    path: PathBuf,
    target: PathBuf,
}

impl Staging {
    /// Reserve a staging file next to `target`, creating the parent directory
    pub(crate) async fn prepare(target: &Path) -> StashResult<Self> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StashError::io(format!("creating {}", parent.display()), e))?;
        }

        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staged = format!(".{}.{}.partial", name, Uuid::new_v4().simple());
        let path = target.with_file_name(staged);

        Ok(Self {
            path,
            target: target.to_path_buf(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Move the staged file onto the target
    pub(crate) async fn commit(self) -> StashResult<()> {
        if let Err(e) = fs::rename(&self.path, &self.target).await {
            let err = StashError::io(format!("moving artifact into {}", self.target.display()), e);
            self.discard().await;
            return Err(err);
        }

        debug!("Committed {}", self.target.display());
        Ok(())
    }

    /// Remove the staged file, ignoring a file that was never written
    pub(crate) async fn discard(self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staging file {}: {}", self.path.display(), e),
        }
    }
}
