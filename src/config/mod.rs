mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::catalog::Catalog;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./iptvstream.toml",
        "./config.toml",
        "~/.config/iptvstream/config.toml",
        "/etc/iptvstream/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Build the catalog described by `config`.
pub fn build_catalog(config: &Config) -> Result<Catalog> {
    if config.channels.is_empty() {
        return Ok(Catalog::builtin());
    }
    Catalog::new(config.channels.clone()).context("Invalid channel list")
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let origin = url::Url::parse(&config.share.origin)
        .with_context(|| format!("Invalid share origin: {}", config.share.origin))?;
    if !matches!(origin.scheme(), "http" | "https") {
        anyhow::bail!("Share origin must be http or https: {}", config.share.origin);
    }

    if config.player.native_players.is_empty() {
        tracing::warn!("No native players configured; playback will be unavailable");
    }

    build_catalog(config)?;

    Ok(())
}
