//! Prune command - run the startup reconciliation and report it

use super::open_cache;
use crate::cache::ReconcileReport;
use crate::cli::args::{OutputFormat, PruneArgs};
use crate::config::Config;
use crate::error::StashResult;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the prune command
pub async fn execute(args: PruneArgs, config: &Config) -> StashResult<()> {
    let ctx = match args.format {
        OutputFormat::Table => UiContext::detect(),
        OutputFormat::Json | OutputFormat::Plain => UiContext::non_interactive(),
    };
    let cache = open_cache(config);

    if !cache.mode().is_enabled() {
        ui::step_warn_hint(&ctx, "Caching is disabled", "Nothing to prune");
        return Ok(());
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Pruning {}", cache.root().display()));

    let report = cache.ready().await;

    if report.failed > 0 {
        spinner.stop_error(&format!(
            "Pruned {} of {} marked entries",
            report.deleted,
            report.marked()
        ));
    } else {
        spinner.stop(&format!("Pruned {} entries", report.deleted));
    }

    match args.format {
        OutputFormat::Table => {
            ui::key_value(&ctx, "retention limit", &cache.mode().retention_limit().to_string());
            print_report(&ctx, &report);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => println!("{}", report.deleted),
    }

    Ok(())
}

fn print_report(ctx: &UiContext, report: &ReconcileReport) {
    ui::key_value(ctx, "scanned", &report.scanned.to_string());
    ui::key_value(ctx, "unrecognized", &report.unrecognized.to_string());
    ui::key_value(ctx, "outdated", &report.outdated.to_string());
    ui::key_value(ctx, "excess", &report.excess.to_string());
    ui::key_value(ctx, "deleted", &report.deleted.to_string());
    if report.failed > 0 {
        ui::step_warn_hint(
            ctx,
            &format!("{} entries could not be deleted", report.failed),
            "Check permissions on the entries logged above",
        );
    }
}
