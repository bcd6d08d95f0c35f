//! Clear command - remove every cache entry

use crate::cli::args::ClearArgs;
use crate::config::Config;
use crate::error::StashResult;
use crate::store::{BlobStore, FsBlobStore};
use crate::ui::{self, UiContext};
use futures_util::future::join_all;
use tracing::debug;

/// Execute the clear command
pub async fn execute(args: ClearArgs, config: &Config) -> StashResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);

    let Some(root) = config.cache.root() else {
        ui::step_warn_hint(&ctx, "Caching is disabled", "Nothing to clear");
        return Ok(());
    };

    let store = FsBlobStore::new();
    if !store.exists(&root).await? {
        ui::step_info(&ctx, &format!("No cache at {}", root.display()));
        return Ok(());
    }

    let entries = store.resolve(&root).await?;
    if entries.is_empty() {
        ui::step_info(&ctx, "Cache is already empty");
        return Ok(());
    }

    ui::intro(&ctx, "Clear cache");
    ui::key_value(&ctx, "root", &root.display().to_string());
    ui::key_value(&ctx, "entries", &entries.len().to_string());

    let confirmed = ui::confirm(
        &ctx,
        &format!("Remove all {} entries?", entries.len()),
        false,
    )
    .await?;

    if !confirmed {
        ui::remark(&ctx, "Aborted (use --yes to skip confirmation)");
        return Ok(());
    }

    let store = &store;
    let results = join_all(entries.iter().map(|entry| async move {
        (entry, store.delete(&entry.location).await)
    }))
    .await;

    let mut removed = 0;
    for (entry, result) in results {
        match result {
            Ok(()) => {
                debug!("Removed {}", entry.name);
                removed += 1;
            }
            Err(e) => ui::step_error_detail(
                &ctx,
                &format!("Failed to remove {}", entry.name),
                &e.to_string(),
            ),
        }
    }

    ui::step_ok_detail(
        &ctx,
        &format!("Removed {} of {} entries", removed, entries.len()),
        &root.display().to_string(),
    );

    Ok(())
}
