use async_trait::async_trait;
use cb_core::{Result, SeenUrlStore};
use tokio::sync::RwLock;

/// Keeps the marker in process memory; forgotten when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    last_url: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last_url(&self) -> Option<String> {
        self.last_url.read().await.clone()
    }
}

#[async_trait]
impl SeenUrlStore for MemoryStore {
    async fn is_new(&self, url: &str) -> Result<bool> {
        Ok(self.last_url.read().await.as_deref() != Some(url))
    }

    async fn record(&self, url: &str) -> Result<()> {
        *self.last_url.write().await = Some(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_new("https://www.soccernews.nl/news/1").await.unwrap());

        store.record("https://www.soccernews.nl/news/1").await.unwrap();
        assert!(!store.is_new("https://www.soccernews.nl/news/1").await.unwrap());
        assert!(store.is_new("https://www.soccernews.nl/news/2").await.unwrap());

        // Only the most recent URL is remembered.
        store.record("https://www.soccernews.nl/news/2").await.unwrap();
        assert!(store.is_new("https://www.soccernews.nl/news/1").await.unwrap());
        assert_eq!(store.last_url().await.as_deref(), Some("https://www.soccernews.nl/news/2"));
    }
}
