//! List command - show cache entries and their retention verdicts

use crate::cache::{EvictionPlan, PlannedEntry, Verdict};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::StashResult;
use crate::store::{BlobStore, FsBlobStore};
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

/// One row of the listing
#[derive(Debug, Serialize)]
struct EntryRow {
    name: String,
    package: Option<String>,
    version: Option<String>,
    size_bytes: Option<u64>,
    modified: Option<DateTime<Utc>>,
    verdict: Verdict,
}

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> StashResult<()> {
    let ctx = match args.format {
        OutputFormat::Table => UiContext::detect(),
        OutputFormat::Json | OutputFormat::Plain => UiContext::non_interactive(),
    };
    let settings = config.cache.settings();

    let Some(root) = settings.root else {
        ui::step_warn_hint(&ctx, "Caching is disabled", "Set cache.enabled = true");
        return print_empty(args.format);
    };

    let store = FsBlobStore::new();
    if !store.exists(&root).await? {
        ui::step_info(&ctx, &format!("No cache at {}", root.display()));
        return print_empty(args.format);
    }

    let listing = store.resolve(&root).await?;
    let plan = EvictionPlan::new(listing, settings.retention_limit.get());

    let mut rows = Vec::with_capacity(plan.entries.len());
    for planned in &plan.entries {
        rows.push(row_for(planned).await);
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Plain => print_plain(&rows),
    }

    Ok(())
}

async fn row_for(planned: &PlannedEntry) -> EntryRow {
    // Entries can vanish between listing and stat
    let metadata = tokio::fs::metadata(&planned.entry.location).await.ok();

    EntryRow {
        name: planned.entry.name.clone(),
        package: planned.identity.as_ref().map(|i| i.package_id.clone()),
        version: planned.identity.as_ref().map(|i| i.version.to_string()),
        size_bytes: metadata.as_ref().filter(|m| m.is_file()).map(|m| m.len()),
        modified: metadata
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from),
        verdict: planned.verdict,
    }
}

fn print_empty(format: OutputFormat) -> StashResult<()> {
    match format {
        OutputFormat::Json => print_json(&[]),
        OutputFormat::Table => {
            println!("No cache entries found.");
            Ok(())
        }
        OutputFormat::Plain => Ok(()),
    }
}

fn print_table(rows: &[EntryRow]) {
    if rows.is_empty() {
        println!("No cache entries found.");
        return;
    }

    println!(
        "{:<36} {:<24} {:<10} {:>10} {:<17} {:<12}",
        "NAME", "PACKAGE", "VERSION", "SIZE", "MODIFIED", "VERDICT"
    );
    println!("{}", "-".repeat(114));

    for row in rows {
        let verdict = match row.verdict {
            Verdict::Keep => style("keep").green().to_string(),
            Verdict::Outdated => style("outdated").yellow().to_string(),
            Verdict::Excess => style("excess").yellow().to_string(),
            Verdict::Unrecognized => style("unrecognized").red().to_string(),
        };

        println!(
            "{:<36} {:<24} {:<10} {:>10} {:<17} {:<12}",
            truncate(&row.name, 36),
            truncate(row.package.as_deref().unwrap_or("-"), 24),
            row.version.as_deref().unwrap_or("-"),
            row.size_bytes.map(format_bytes).unwrap_or_else(|| "-".to_string()),
            row.modified
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            verdict
        );
    }

    let total: u64 = rows.iter().filter_map(|r| r.size_bytes).sum();
    let evicted = rows.iter().filter(|r| r.verdict.is_marked()).count();

    println!();
    println!(
        "Total: {} entr{} ({}), {} to prune at next start",
        rows.len(),
        if rows.len() == 1 { "y" } else { "ies" },
        format_bytes(total),
        evicted
    );
}

fn print_json(rows: &[EntryRow]) -> StashResult<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn print_plain(rows: &[EntryRow]) {
    for row in rows {
        println!("{}\t{}", row.name, row.verdict);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a byte count for display
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
