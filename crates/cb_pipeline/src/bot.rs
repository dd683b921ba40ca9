use std::sync::Arc;
use std::time::Duration;

use cb_core::{
    Article, ArticleFeed, ArticleSearch, Attribution, Caption, ClassificationResult, Error,
    FontSet, HashtagTable, PublishResult, Publisher, Rasterizer, RejectReason, Result, Scraper,
    SeenUrlStore,
};
use tracing::info;

use crate::attribution::AttributionResolver;
use crate::caption::CaptionComposer;
use crate::classify::Classifier;
use crate::config::BotConfig;
use crate::layout::LayoutRenderer;
use crate::with_timeout;

/// Everything the bot talks to outside of its own logic.
pub struct Collaborators {
    pub scrapers: Vec<Arc<dyn Scraper>>,
    pub feed: Option<Arc<dyn ArticleFeed>>,
    pub search: Arc<dyn ArticleSearch>,
    pub store: Arc<dyn SeenUrlStore>,
    pub fonts: Arc<dyn FontSet>,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub publisher: Arc<dyn Publisher>,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Process this article instead of asking the feed
    pub url: Option<String>,
    /// Skip the seen-URL check
    pub force: bool,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    AlreadySeen { url: String },
    Rejected { url: String, reason: RejectReason },
    Published { url: String, caption: Caption, result: PublishResult },
}

/// Caption and image for an accepted article.
#[derive(Debug, Clone)]
pub struct Post {
    pub attribution: Attribution,
    pub caption: Caption,
    pub image: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub article: Article,
    pub classification: ClassificationResult,
    pub post: Option<Post>,
}

pub struct Bot {
    classifier: Classifier,
    resolver: AttributionResolver,
    composer: CaptionComposer,
    renderer: LayoutRenderer,
    hashtags: HashtagTable,
    collaborators: Collaborators,
    timeout: Duration,
}

impl Bot {
    pub fn new(config: &BotConfig, hashtags: HashtagTable, collaborators: Collaborators) -> Result<Self> {
        let timeout = config.http.timeout();
        let resolver = AttributionResolver::new(config.attribution.clone(), collaborators.search.clone())?
            .with_timeout(timeout);
        Ok(Self {
            classifier: Classifier::new(config.classifier.clone()),
            resolver,
            composer: CaptionComposer::new(config.caption.clone()),
            renderer: LayoutRenderer::new(config.layout.clone()),
            hashtags,
            collaborators,
            timeout,
        })
    }

    /// Processes at most one article: the explicit URL or the feed's newest.
    ///
    /// Nothing is published if any step before publishing fails, and the
    /// seen-URL marker only moves once the article has been handled.
    pub async fn run(&self, options: RunOptions) -> Result<RunOutcome> {
        let url = match options.url {
            Some(url) => url,
            None => self.latest_url().await?,
        };

        if !options.force && !self.collaborators.store.is_new(&url).await? {
            info!("⏭️ No new article ({})", url);
            return Ok(RunOutcome::AlreadySeen { url });
        }

        let article = self.fetch(&url).await?;
        let classification = self.classifier.classify(&article);
        if let Some(reason) = classification.reason {
            info!("🚫 Skipping {}: {}", article.title, reason);
            self.collaborators.store.record(&url).await?;
            return Ok(RunOutcome::Rejected { url, reason });
        }

        let post = self.prepare(&article).await?;
        let publisher = &self.collaborators.publisher;
        info!("📤 Publishing via {}", publisher.name());
        let result = publisher.publish(&post.caption, &post.image).await?;
        self.collaborators.store.record(&url).await?;
        info!("✅ Published {}", article.title);

        Ok(RunOutcome::Published {
            url,
            caption: post.caption,
            result,
        })
    }

    /// Scrapes and prepares an article without storing or publishing anything.
    pub async fn preview(&self, url: &str) -> Result<Preview> {
        let article = self.fetch(url).await?;
        let classification = self.classifier.classify(&article);
        let post = if classification.accepted {
            Some(self.prepare(&article).await?)
        } else {
            None
        };
        Ok(Preview {
            article,
            classification,
            post,
        })
    }

    /// Resolves attribution, composes the caption and renders the image.
    pub async fn prepare(&self, article: &Article) -> Result<Post> {
        let attribution = self.resolver.resolve(article).await;
        let caption = self.composer.compose(article, &attribution, &self.hashtags);
        info!("✍️ Caption ready ({} characters)", caption.as_str().chars().count());

        let image = self.image(article)?;

        Ok(Post {
            attribution,
            caption,
            image,
        })
    }

    /// Lays out and rasterizes the article image.
    pub fn image(&self, article: &Article) -> Result<Vec<u8>> {
        let image = self.renderer.render(
            &article.title,
            &article.preface,
            &article.body,
            self.collaborators.fonts.as_ref(),
            self.collaborators.rasterizer.as_ref(),
        )?;
        info!("🖼️ Rendered image ({} bytes)", image.len());
        Ok(image)
    }

    /// Scrapes an article and renders its image, ignoring classification.
    pub async fn render(&self, url: &str) -> Result<Vec<u8>> {
        let article = self.fetch(url).await?;
        self.image(&article)
    }

    async fn latest_url(&self) -> Result<String> {
        let feed = self
            .collaborators
            .feed
            .as_ref()
            .ok_or_else(|| Error::Config("No article URL given and no feed configured".to_string()))?;
        let url = with_timeout("feed lookup", self.timeout, feed.latest_url()).await?;
        info!("🔎 Latest article: {}", url);
        Ok(url)
    }

    async fn fetch(&self, url: &str) -> Result<Article> {
        let scraper = self
            .collaborators
            .scrapers
            .iter()
            .find(|s| s.can_handle(url))
            .ok_or_else(|| Error::Fetch(format!("No scraper found for URL: {}", url)))?;
        info!("🦗 Scraping {} from {}", url, scraper.source());
        with_timeout("article fetch", self.timeout, scraper.scrape_article(url)).await
    }
}
