//! Delete command - release an artifact returned by download

use super::open_cache;
use crate::cli::args::DeleteArgs;
use crate::config::Config;
use crate::error::{StashError, StashResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

/// Execute the delete command
///
/// Only direct children of the cache root (the temp directory when caching
/// is disabled) are accepted.
pub async fn execute(args: DeleteArgs, config: &Config) -> StashResult<()> {
    let ctx = UiContext::detect();
    let cache = open_cache(config);

    if !is_root_child(cache.root(), &args.location).await {
        return Err(StashError::User(format!(
            "{} is not an entry of the cache root {}",
            args.location.display(),
            cache.root().display()
        )));
    }

    cache.delete_artifact(&args.location).await?;

    if cache.mode().is_enabled() {
        ui::step_info(
            &ctx,
            &format!(
                "Kept {} (cached entries are removed by retention)",
                args.location.display()
            ),
        );
    } else {
        ui::step_ok(&ctx, &format!("Deleted {}", args.location.display()));
    }

    Ok(())
}

/// Whether `location` sits directly under `root`
async fn is_root_child(root: &Path, location: &Path) -> bool {
    let Some(parent) = location.parent() else {
        return false;
    };
    if parent == root {
        return true;
    }

    // The temp dir is often reached through a symlink
    match (fs::canonicalize(parent).await, fs::canonicalize(root).await) {
        (Ok(parent), Ok(root)) => parent == root,
        _ => false,
    }
}
