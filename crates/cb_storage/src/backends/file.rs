use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cb_core::{Error, Result, SeenUrlStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub url: String,
    pub seen_at: DateTime<Utc>,
}

/// Persists the last seen URL as a single JSON value on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> Result<Option<Marker>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Corrupt marker file {}: {}", self.path.display(), e)))
    }

    async fn save(&self, marker: &Marker) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Readers only ever see a complete marker: write a sibling file, then rename.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(marker)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SeenUrlStore for FileStore {
    async fn is_new(&self, url: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let marker = self.load().await?;
        Ok(marker.map_or(true, |m| m.url != url))
    }

    async fn record(&self, url: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let marker = Marker {
            url: url.to_string(),
            seen_at: Utc::now(),
        };
        self.save(&marker).await?;
        debug!("Recorded {} in {}", url, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("saved_url.json");
        let store = FileStore::new(&path);

        assert!(store.is_new("https://www.soccernews.nl/news/1").await.unwrap());
        assert!(store.load().await.unwrap().is_none());

        store.record("https://www.soccernews.nl/news/1").await.unwrap();
        assert!(path.exists());
        assert!(!store.is_new("https://www.soccernews.nl/news/1").await.unwrap());

        // A second store over the same file sees the persisted marker.
        let reopened = FileStore::new(&path);
        assert!(!reopened.is_new("https://www.soccernews.nl/news/1").await.unwrap());
        assert!(reopened.is_new("https://www.soccernews.nl/news/2").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_marker_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved_url.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.is_new("https://x.nl").await, Err(Error::Storage(_))));
    }
}
