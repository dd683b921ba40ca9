use async_trait::async_trait;
use crate::types::SearchHit;
use crate::Result;

#[async_trait]
pub trait ArticleSearch: Send + Sync {
    /// Runs a web search; an empty result is not an error
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}
