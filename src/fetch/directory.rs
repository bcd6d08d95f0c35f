//! Fetch artifacts from a local mirror directory

use super::{ArtifactFetcher, OperationContext, Staging};
use crate::cache::Identity;
use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Copies `<mirror>/<package_id>-<version>` into the cache
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    mirror: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(mirror: PathBuf) -> Self {
        Self { mirror }
    }

    /// Location of an identity inside the mirror
    pub fn source_path(&self, identity: &Identity) -> PathBuf {
        self.mirror.join(identity.file_name())
    }
}

#[async_trait]
impl ArtifactFetcher for DirectoryFetcher {
    async fn fetch(
        &self,
        identity: &Identity,
        target: &Path,
        ctx: &OperationContext,
    ) -> StashResult<()> {
        let source = self.source_path(identity);
        let present = fs::try_exists(&source)
            .await
            .map_err(|e| StashError::io(format!("checking {}", source.display()), e))?;
        if !present {
            return Err(StashError::ArtifactNotFound(identity.to_string()));
        }

        debug!(
            operation = %ctx.id,
            "Copying {} from {}",
            identity,
            source.display()
        );

        let staging = Staging::prepare(target).await?;
        if let Err(e) = fs::copy(&source, staging.path()).await {
            staging.discard().await;
            return Err(StashError::io(format!("copying {}", source.display()), e));
        }

        staging.commit().await
    }

    fn source_name(&self) -> &'static str {
        "directory"
    }
}
