//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pkgstash - bounded on-disk cache for package artifacts
///
/// Downloads package artifacts once and serves repeat installs of the same
/// version from a local cache that prunes itself at startup.
#[derive(Parser, Debug)]
#[command(name = "pkgstash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PKGSTASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (overrides cache.dir)
    #[arg(long, global = true, env = "PKGSTASH_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Use one-shot temporary files instead of the cache (wins over --cache-dir)
    #[arg(long, global = true)]
    pub no_cache: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a package artifact (or reuse the cached copy) and print its path
    Download(DownloadArgs),

    /// Release an artifact path returned by download
    Delete(DeleteArgs),

    /// List cache entries and what the next startup prune will do with them
    List(ListArgs),

    /// Prune the cache back to retention policy
    Prune(PruneArgs),

    /// Remove every entry from the cache
    Clear(ClearArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the download command
#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Package id (e.g. publisher.tool)
    pub package: String,

    /// Version in MAJOR.MINOR.PATCH form
    #[arg(id = "pkg_version", value_name = "VERSION")]
    pub version: String,

    /// Label attached to log lines for this download
    #[arg(long, default_value = "download")]
    pub label: String,
}

/// Arguments for the delete command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Artifact path
    pub location: PathBuf,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the prune command
#[derive(Parser, Debug)]
pub struct PruneArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.retention_limit)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
