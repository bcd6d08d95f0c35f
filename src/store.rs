//! Blob store abstraction
//!
//! The cache never touches the filesystem directly; every existence check,
//! directory listing and deletion goes through a [`BlobStore`].

use crate::error::{StashError, StashResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// One direct child of a listed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// File name of the child
    pub name: String,
    /// Full location of the child
    pub location: PathBuf,
}

/// Storage primitives the cache is built on
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether a location exists
    async fn exists(&self, location: &Path) -> StashResult<bool>;

    /// List the direct children of a location (fails if it does not exist)
    async fn resolve(&self, location: &Path) -> StashResult<Vec<BlobEntry>>;

    /// Delete a location (fails if it does not exist or cannot be removed)
    ///
    /// Directories are only removed when already empty.
    async fn delete(&self, location: &Path) -> StashResult<()>;
}

/// Local filesystem blob store
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBlobStore;

impl FsBlobStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, location: &Path) -> StashResult<bool> {
        fs::try_exists(location)
            .await
            .map_err(|e| StashError::io(format!("checking {}", location.display()), e))
    }

    async fn resolve(&self, location: &Path) -> StashResult<Vec<BlobEntry>> {
        let mut dir = fs::read_dir(location).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StashError::BlobNotFound(location.to_path_buf()),
            _ => StashError::io(format!("listing {}", location.display()), e),
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StashError::io(format!("reading entry in {}", location.display()), e))?
        {
            entries.push(BlobEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                location: entry.path(),
            });
        }

        Ok(entries)
    }

    async fn delete(&self, location: &Path) -> StashResult<()> {
        let metadata = fs::symlink_metadata(location).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StashError::BlobNotFound(location.to_path_buf()),
            _ => StashError::io(format!("inspecting {}", location.display()), e),
        })?;

        let result = if metadata.is_dir() {
            fs::remove_dir(location).await
        } else {
            fs::remove_file(location).await
        };

        result.map_err(|e| StashError::io(format!("removing {}", location.display()), e))
    }
}
