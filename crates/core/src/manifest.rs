//! Fetch manifest stored alongside the cached catalog copy.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing the last remote catalog fetch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogManifest {
    /// URL the cached copy was fetched from.
    pub source: Option<String>,
    /// Fetch timestamp.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CatalogManifest {
    /// Load the manifest from the given path, returning `None` if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Some(manifest))
    }

    /// Persist the manifest to the given file, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize catalog manifest")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}

/// Helper to compute the manifest path inside the cache directory.
pub fn manifest_path(cache_root: impl AsRef<Path>) -> PathBuf {
    cache_root.as_ref().join("manifest.json")
}
