//! Application configuration.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG: &str = r#"# Board Games Codex configuration.
#
# source: catalog document to load; a local path or an http(s) URL.
# cache_root: where fetched catalog copies and the manifest are kept.

source = "games.json"
"#;

/// Runtime settings for the catalog browser.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Catalog document to load: a filesystem path or an `http(s)://` URL.
    #[serde(default = "default_source")]
    pub source: String,
    /// Directory for fetched catalog copies and their manifest.
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            cache_root: default_cache_root(),
        }
    }
}

impl AppConfig {
    /// Loads settings from the user config file plus `BGCODEX_*` overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Loads settings from an explicit file path plus environment overrides.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("BGCODEX"))
            .build()
            .context("failed to read configuration")?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

fn default_source() -> String {
    "games.json".to_string()
}

fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("bgcodex")
}

/// Path of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("bgcodex")
        .join("config.toml")
}

/// Writes a commented default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    if path.exists() {
        return Ok(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
