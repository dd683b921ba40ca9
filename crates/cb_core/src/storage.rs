use async_trait::async_trait;
use crate::Result;

/// Remembers the most recently processed article URL.
///
/// Only a single value is kept, so out-of-order runs can miss duplicates.
#[async_trait]
pub trait SeenUrlStore: Send + Sync {
    /// Returns true if `url` differs from the stored marker
    async fn is_new(&self, url: &str) -> Result<bool>;

    /// Replace the stored marker with `url`
    async fn record(&self, url: &str) -> Result<()>;
}
