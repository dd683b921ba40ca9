use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name of the news source
    fn source(&self) -> &str;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Scrapes an article from the given URL
    async fn scrape_article(&self, url: &str) -> Result<Article>;
}

/// Where the bot learns about the newest article.
#[async_trait]
pub trait ArticleFeed: Send + Sync {
    /// Returns the URL of the most recently announced article
    async fn latest_url(&self) -> Result<String>;
}
