//! Layered TOML configuration
//!
//! Priority, lowest first:
//! 1. Built-in defaults
//! 2. XDG config: `~/.config/image-analyzer/config.toml`
//! 3. `--config <path>`
//!
//! Layers are merged key by key, so a file only needs the values it changes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image_analyzer::AnalyzerConfig;
use tracing::{debug, info};

/// Load, merge and validate the effective configuration.
pub fn load(explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    let mut merged = toml::Table::new();

    if let Some(xdg_path) = xdg_config_path() {
        if xdg_path.exists() {
            info!("Loading XDG config: {}", xdg_path.display());
            merge_tables(&mut merged, read_table(&xdg_path)?);
        } else {
            debug!("XDG config not found: {}", xdg_path.display());
        }
    }

    if let Some(path) = explicit {
        info!("Loading config: {}", path.display());
        merge_tables(&mut merged, read_table(path)?);
    }

    from_table(merged)
}

/// Turn a merged table into a validated configuration.
pub fn from_table(table: toml::Table) -> Result<AnalyzerConfig> {
    let config: AnalyzerConfig = toml::Value::Table(table)
        .try_into()
        .context("Invalid configuration values")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    text.parse::<toml::Table>()
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Overlay `other` onto `base`, recursing into nested tables.
fn merge_tables(base: &mut toml::Table, other: toml::Table) {
    for (key, value) in other {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("image-analyzer").join("config.toml"))
}

/// Render a configuration as TOML for `image-analyzer config`.
pub fn render(config: &AnalyzerConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}
