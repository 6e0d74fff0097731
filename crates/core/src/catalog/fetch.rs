//! One-shot retrieval of a remote catalog document.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use crate::manifest::{manifest_path, CatalogManifest};

use super::loader::CatalogError;

/// Fetches the catalog document from `url`. Single attempt, no retry.
pub async fn fetch_catalog(url: &str) -> Result<String, CatalogError> {
    let response = reqwest::get(url)
        .await
        .map_err(|source| CatalogError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Http {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|source| CatalogError::Fetch {
        url: url.to_string(),
        source,
    })
}

/// Stores a fetched document plus its manifest under `cache_root`.
pub fn cache_copy(cache_root: &Path, url: &str, raw: &str) -> Result<()> {
    std::fs::create_dir_all(cache_root)
        .with_context(|| format!("failed to create {}", cache_root.display()))?;

    let path = cache_root.join("games.json");
    std::fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;

    let manifest = CatalogManifest {
        source: Some(url.to_string()),
        fetched_at: Some(Utc::now()),
    };
    manifest.persist(manifest_path(cache_root))?;

    debug!(path = %path.display(), "cached fetched catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cache_copy_writes_document_and_manifest() -> Result<()> {
        let temp = tempdir()?;
        let cache_root = temp.path().join("cache");

        cache_copy(
            &cache_root,
            "https://example.com/games.json",
            r#"[{"id": 1, "name": "Шахматы"}]"#,
        )?;

        let copied = std::fs::read_to_string(cache_root.join("games.json"))?;
        assert!(copied.contains("Шахматы"));

        let manifest = CatalogManifest::load(manifest_path(&cache_root))?
            .expect("manifest should be written");
        assert_eq!(
            manifest.source.as_deref(),
            Some("https://example.com/games.json")
        );
        assert!(manifest.fetched_at.is_some());
        Ok(())
    }
}
