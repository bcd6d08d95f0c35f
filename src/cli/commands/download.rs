//! Download command - fetch an artifact or reuse the cached copy

use super::open_cache;
use crate::cache::Identity;
use crate::cli::args::DownloadArgs;
use crate::config::Config;
use crate::error::StashResult;
use crate::fetch::OperationContext;
use crate::ui::{TaskSpinner, UiContext};
use tracing::info;

/// Execute the download command
///
/// The artifact path is the only thing written to stdout.
pub async fn execute(args: DownloadArgs, config: &Config) -> StashResult<()> {
    let identity = Identity::parse(args.package, &args.version)?;
    let ctx = UiContext::detect();
    let op = OperationContext::new(args.label);

    let cache = open_cache(config);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Resolving {}", identity));

    match cache.download_artifact(&identity, &op).await {
        Ok(location) => {
            spinner.stop(&format!("{} ready", identity));
            info!(operation = %op.id, label = %op.label, "Artifact at {}", location.display());
            println!("{}", location.display());
            Ok(())
        }
        Err(e) => {
            if e.is_fetch_error() {
                spinner.stop_error(&format!("Could not fetch {}", identity));
            } else {
                spinner.stop_error(&format!("Cache error for {}", identity));
            }
            Err(e)
        }
    }
}
