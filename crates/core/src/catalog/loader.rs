//! Catalog document parsing and the shared in-memory store.

use std::{path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    manifest::{manifest_path, CatalogManifest},
    models::Game,
};

use super::fetch;

/// Errors raised while loading the catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The local catalog file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the document.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The remote catalog could not be fetched.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        /// URL of the document.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The remote endpoint answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    Http {
        /// URL of the document.
        url: String,
        /// Response status code.
        status: reqwest::StatusCode,
    },
    /// The document is not valid catalog JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Local JSON file.
    File(PathBuf),
    /// Remote document fetched over HTTP.
    Remote(String),
}

impl CatalogSource {
    /// Interprets a configuration string as a path or URL.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Remote(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    /// User-facing label for the status line.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }

    /// True for HTTP sources.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Many(Vec<Game>),
    One(Box<Game>),
}

/// Parses a catalog document. A payload holding a single record object is
/// normalized to a one-element sequence.
pub fn parse_payload(raw: &str) -> Result<Vec<Game>, CatalogError> {
    let payload: CatalogPayload = serde_json::from_str(raw)?;
    Ok(match payload {
        CatalogPayload::Many(games) => games,
        CatalogPayload::One(game) => vec![*game],
    })
}

#[derive(Default)]
struct Inner {
    games: Vec<Game>,
}

/// Thread-safe, reloadable snapshot of the catalog.
#[derive(Clone)]
pub struct CatalogStore {
    source: CatalogSource,
    cache_root: PathBuf,
    inner: Arc<RwLock<Inner>>,
}

impl CatalogStore {
    /// Builds an empty store reading from the given source.
    pub fn new(source: CatalogSource, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_root: cache_root.into(),
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Loads the catalog document and replaces the snapshot, returning the
    /// record count. A failed load leaves the previous snapshot untouched.
    pub async fn load(&self) -> Result<usize, CatalogError> {
        let games = match &self.source {
            CatalogSource::File(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Read {
                        path: path.clone(),
                        source,
                    })?;
                parse_payload(&raw)?
            }
            CatalogSource::Remote(url) => {
                let raw = fetch::fetch_catalog(url).await?;
                let games = parse_payload(&raw)?;
                if let Err(error) = fetch::cache_copy(&self.cache_root, url, &raw) {
                    warn!(%error, "failed to cache fetched catalog");
                }
                games
            }
        };

        let count = games.len();
        info!(count, source = %self.source.label(), "catalog loaded");
        self.inner.write().games = games;
        Ok(count)
    }

    /// Cloned snapshot of the loaded records, document order preserved.
    pub fn games(&self) -> Vec<Game> {
        self.inner.read().games.clone()
    }

    /// Exact-id lookup over the snapshot.
    pub fn find(&self, id: i64) -> Option<Game> {
        self.inner
            .read()
            .games
            .iter()
            .find(|game| game.id == id)
            .cloned()
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.inner.read().games.len()
    }

    /// True when no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.inner.read().games.is_empty()
    }

    /// Source this store reads from.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Last recorded fetch metadata, if a cached copy exists.
    pub fn manifest(&self) -> Option<CatalogManifest> {
        match CatalogManifest::load(manifest_path(&self.cache_root)) {
            Ok(manifest) => manifest,
            Err(error) => {
                warn!(%error, "failed to read catalog manifest");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"[
        {"id": 1, "name": "Шахматы", "meta": {"complexity": "medium"}},
        {"id": 2, "name": "Го", "description": "Окружите территорию"}
    ]"#;

    #[test]
    fn parses_record_sequence() {
        let games = parse_payload(SAMPLE).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].name, "Шахматы");
        assert_eq!(games[1].id, 2);
    }

    #[test]
    fn normalizes_single_record_to_sequence() {
        let games = parse_payload(r#"{"id": 5, "name": "Дженга"}"#).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, 5);
    }

    #[test]
    fn rejects_malformed_documents() {
        let err = parse_payload("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let err = parse_payload(r#"{"name": 42}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn source_parse_distinguishes_urls_from_paths() {
        assert!(CatalogSource::parse("https://example.com/games.json").is_remote());
        assert!(CatalogSource::parse("http://example.com/games.json").is_remote());
        assert!(!CatalogSource::parse("data/games.json").is_remote());
        assert_eq!(
            CatalogSource::parse("games.json"),
            CatalogSource::File(PathBuf::from("games.json"))
        );
    }

    #[tokio::test]
    async fn loads_local_document() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("games.json");
        fs::write(&path, SAMPLE).unwrap();

        let store = CatalogStore::new(CatalogSource::File(path), temp.path().join("cache"));
        let count = store.load().await.unwrap();
        assert_eq!(count, 2);

        let games = store.games();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, 1);
        assert_eq!(games[1].id, 2);

        assert_eq!(store.find(2).map(|game| game.name), Some("Го".to_string()));
        assert!(store.find(99).is_none());
    }

    #[tokio::test]
    async fn missing_document_reports_read_error() {
        let temp = tempdir().unwrap();
        let store = CatalogStore::new(
            CatalogSource::File(temp.path().join("absent.json")),
            temp.path().join("cache"),
        );

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("games.json");
        fs::write(&path, SAMPLE).unwrap();

        let store = CatalogStore::new(
            CatalogSource::File(path.clone()),
            temp.path().join("cache"),
        );
        store.load().await.unwrap();
        assert_eq!(store.len(), 2);

        fs::write(&path, "{broken").unwrap();
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert_eq!(store.len(), 2, "snapshot must survive a failed reload");
    }
}
