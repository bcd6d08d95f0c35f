//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{StashError, StashResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "cache.enabled",
    "cache.dir",
    "cache.retention_limit",
    "source.url",
    "source.dir",
    "source.timeout_secs",
];

/// Execute the config command
///
/// `config` is the file configuration before any command-line overrides,
/// so `set` never persists a `--cache-dir` given for one invocation.
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> StashResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> StashResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> StashResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> StashResult<()> {
    let ctx = UiContext::detect();

    if !VALID_KEYS.contains(&key) {
        ui::step_error_detail(&ctx, "Unknown config key", key);
        ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
        return Err(StashError::User(format!("Unknown config key: {}", key)));
    }

    let mut config = config.clone();
    apply_value(&mut config, key, value)?;
    ConfigManager::validate(&config).map_err(StashError::User)?;

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Set one dot-separated key on `config`
fn apply_value(config: &mut Config, key: &str, value: &str) -> StashResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = value.to_string(),

        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,
        ["cache", "dir"] => config.cache.dir = parse_optional(value).map(PathBuf::from),
        ["cache", "retention_limit"] => config.cache.retention_limit = parse_number(value)?,

        ["source", "url"] => config.source.url = parse_optional(value).map(str::to_string),
        ["source", "dir"] => config.source.dir = parse_optional(value).map(PathBuf::from),
        ["source", "timeout_secs"] => config.source.timeout_secs = parse_number(value)?,

        _ => return Err(StashError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> StashResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(StashError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> StashResult<T> {
    value
        .parse()
        .map_err(|_| StashError::User(format!("Invalid number: {}", value)))
}

/// Empty string or "none" unsets an optional key
fn parse_optional(value: &str) -> Option<&str> {
    match value.trim() {
        "" | "none" => None,
        v => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn apply_cache_keys() {
        let mut config = Config::default();

        apply_value(&mut config, "cache.enabled", "no").unwrap();
        apply_value(&mut config, "cache.dir", "/srv/stash").unwrap();
        apply_value(&mut config, "cache.retention_limit", "4").unwrap();

        assert!(!config.cache.enabled);
        assert_eq!(config.cache.dir, Some(PathBuf::from("/srv/stash")));
        assert_eq!(config.cache.retention_limit, 4);
    }

    #[test]
    fn apply_source_keys() {
        let mut config = Config::default();

        apply_value(&mut config, "source.url", "https://mirror.test/{id}/{version}").unwrap();
        apply_value(&mut config, "source.timeout_secs", "15").unwrap();
        assert_eq!(
            config.source.url.as_deref(),
            Some("https://mirror.test/{id}/{version}")
        );
        assert_eq!(config.source.timeout_secs, 15);

        apply_value(&mut config, "source.url", "none").unwrap();
        assert!(config.source.url.is_none());
    }

    #[test]
    fn apply_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply_value(&mut config, "cache.enabled", "maybe").is_err());
        assert!(apply_value(&mut config, "cache.retention_limit", "-1").is_err());
        assert!(apply_value(&mut config, "vm.name", "x").is_err());
    }

    #[tokio::test]
    async fn set_value_persists_and_validates() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));
        let config = Config::default();

        set_value(&manager, &config, "cache.retention_limit", "3")
            .await
            .unwrap();
        let saved = manager.load().await.unwrap();
        assert_eq!(saved.cache.retention_limit, 3);

        let err = set_value(&manager, &saved, "cache.retention_limit", "0").await;
        assert!(err.is_err());
        assert_eq!(manager.load().await.unwrap().cache.retention_limit, 3);
    }
}
