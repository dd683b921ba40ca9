use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cb_core::{
    Article, ArticleFeed, ArticleSearch, Attribution, Caption, Error, FontMetrics, FontRole,
    FontSet, HashtagTable, ImageLayout, PublishResult, Publisher, Rasterizer, RejectReason, Result,
    Scraper, SearchHit, SeenUrlStore,
};
use cb_pipeline::{Bot, BotConfig, Collaborators, LayoutRenderer, RunOptions, RunOutcome};

const ARTICLE_URL: &str = "https://www.soccernews.nl/news/800001/psv-haalt-verdediger";
const QUOTE: &str = "Hij past precies in het profiel dat we zochten voor de linkerkant van onze verdediging";

struct StaticScraper {
    article: Option<Article>,
}

#[async_trait]
impl Scraper for StaticScraper {
    fn source(&self) -> &str {
        "SoccerNews"
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("soccernews.nl")
    }

    async fn scrape_article(&self, url: &str) -> Result<Article> {
        self.article
            .clone()
            .ok_or_else(|| Error::Fetch(format!("connection reset while fetching {}", url)))
    }
}

struct StaticFeed;

#[async_trait]
impl ArticleFeed for StaticFeed {
    async fn latest_url(&self) -> Result<String> {
        Ok(ARTICLE_URL.to_string())
    }
}

#[derive(Default)]
struct NoHitSearch {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl ArticleSearch for NoHitSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(vec![])
    }
}

#[derive(Default)]
struct LastUrl(Mutex<Option<String>>);

#[async_trait]
impl SeenUrlStore for LastUrl {
    async fn is_new(&self, url: &str) -> Result<bool> {
        Ok(self.0.lock().unwrap().as_deref() != Some(url))
    }

    async fn record(&self, url: &str) -> Result<()> {
        *self.0.lock().unwrap() = Some(url.to_string());
        Ok(())
    }
}

struct Mono {
    advance: u32,
    line_height: u32,
}

impl FontMetrics for Mono {
    fn measure(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }
}

struct MonoFonts {
    title: Mono,
    preface: Mono,
    body: Mono,
}

impl FontSet for MonoFonts {
    fn metrics(&self, role: FontRole) -> &dyn FontMetrics {
        match role {
            FontRole::Title => &self.title,
            FontRole::Preface => &self.preface,
            FontRole::Body => &self.body,
        }
    }
}

fn fonts() -> MonoFonts {
    MonoFonts {
        title: Mono { advance: 24, line_height: 50 },
        preface: Mono { advance: 20, line_height: 44 },
        body: Mono { advance: 18, line_height: 40 },
    }
}

/// Keeps the last layout and encodes its height as the "image".
#[derive(Default)]
struct RecordingRasterizer {
    layout: Mutex<Option<ImageLayout>>,
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(&self, layout: &ImageLayout) -> Result<Vec<u8>> {
        *self.layout.lock().unwrap() = Some(layout.clone());
        Ok(layout.height.to_be_bytes().to_vec())
    }
}

#[derive(Default)]
struct RecordingPublisher {
    posts: Mutex<Vec<(String, Vec<u8>)>>,
    fail: bool,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn publish(&self, caption: &Caption, image: &[u8]) -> Result<PublishResult> {
        if self.fail {
            return Err(Error::Publish("401 Unauthorized".to_string()));
        }
        self.posts.lock().unwrap().push((caption.to_string(), image.to_vec()));
        Ok(PublishResult {
            id: Some("1".to_string()),
            url: None,
        })
    }
}

fn article_of_length(length: usize) -> Article {
    let preface = "PSV heeft zich versterkt met een linksback uit de Bundesliga.".to_string();
    let first = format!(
        "Trainer Peter Bosz is blij met de komst, zo vertelt hij aan het Eindhovens Dagblad: \"{}\".",
        QUOTE
    );
    let used = preface.chars().count() + first.chars().count() + 1;
    let filler: String = "de bal rolt door ".repeat(200).chars().take(length - used).collect();
    Article {
        url: ARTICLE_URL.to_string(),
        title: "PSV haalt verdediger binnen".to_string(),
        preface,
        body: vec![first, filler],
        keywords: vec!["PSV".to_string()],
    }
}

struct Harness {
    search: Arc<NoHitSearch>,
    store: Arc<LastUrl>,
    rasterizer: Arc<RecordingRasterizer>,
    publisher: Arc<RecordingPublisher>,
    bot: Bot,
}

fn harness(article: Option<Article>, failing_publisher: bool) -> Harness {
    let search = Arc::new(NoHitSearch::default());
    let store = Arc::new(LastUrl::default());
    let rasterizer = Arc::new(RecordingRasterizer::default());
    let publisher = Arc::new(RecordingPublisher {
        fail: failing_publisher,
        ..RecordingPublisher::default()
    });
    let hashtags: HashtagTable = [("PSV", "psv")].into_iter().collect();

    let collaborators = Collaborators {
        scrapers: vec![Arc::new(StaticScraper { article })],
        feed: Some(Arc::new(StaticFeed)),
        search: search.clone(),
        store: store.clone(),
        fonts: Arc::new(fonts()),
        rasterizer: rasterizer.clone(),
        publisher: publisher.clone(),
    };
    let bot = Bot::new(&BotConfig::default(), hashtags, collaborators).unwrap();

    Harness {
        search,
        store,
        rasterizer,
        publisher,
        bot,
    }
}

#[tokio::test]
async fn test_outlet_fallback_end_to_end() {
    let article = article_of_length(1200);
    assert_eq!(article.text_length(), 1200);
    let h = harness(Some(article.clone()), false);

    let outcome = h.bot.run(RunOptions::default()).await.unwrap();

    let RunOutcome::Published { url, caption, .. } = outcome else {
        panic!("expected the article to be published");
    };
    assert_eq!(url, ARTICLE_URL);
    assert_eq!(caption.as_str(), "'#PSV haalt verdediger binnen'\n\n@ED_Regio");
    assert_eq!(h.search.queries.lock().unwrap().len(), 1);

    let layout = h.rasterizer.layout.lock().unwrap().clone().unwrap();
    let blocks: u32 = layout.blocks.iter().map(|b| b.text.pixel_height).sum();
    assert!(layout.blocks.iter().all(|b| b.text.pixel_height > 0));
    assert_eq!(layout.height, blocks + LayoutRenderer::default().vertical_padding());

    let posts = h.publisher.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, caption.as_str());
    assert_eq!(posts[0].1, layout.height.to_be_bytes().to_vec());
    assert!(!h.store.is_new(ARTICLE_URL).await.unwrap());
}

#[tokio::test]
async fn test_second_run_is_suppressed() {
    let h = harness(Some(article_of_length(1200)), false);
    h.bot.run(RunOptions::default()).await.unwrap();

    let outcome = h.bot.run(RunOptions::default()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::AlreadySeen { .. }));
    assert_eq!(h.publisher.posts.lock().unwrap().len(), 1);

    let forced = RunOptions {
        force: true,
        ..RunOptions::default()
    };
    let outcome = h.bot.run(forced).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Published { .. }));
}

#[tokio::test]
async fn test_rejected_article_is_recorded_but_not_published() {
    let h = harness(Some(article_of_length(2500)), false);
    let outcome = h.bot.run(RunOptions::default()).await.unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::Rejected { reason: RejectReason::TooLong, .. }
    ));
    assert!(h.publisher.posts.lock().unwrap().is_empty());
    assert!(h.search.queries.lock().unwrap().is_empty());
    assert!(!h.store.is_new(ARTICLE_URL).await.unwrap());
}

#[tokio::test]
async fn test_fetch_failure_aborts_without_side_effects() {
    let h = harness(None, false);
    let err = h.bot.run(RunOptions::default()).await.unwrap_err();

    assert!(matches!(err, Error::Fetch(_)));
    assert!(h.publisher.posts.lock().unwrap().is_empty());
    assert!(h.store.is_new(ARTICLE_URL).await.unwrap());
}

#[tokio::test]
async fn test_publish_failure_leaves_marker_untouched() {
    let h = harness(Some(article_of_length(1200)), true);
    let err = h.bot.run(RunOptions::default()).await.unwrap_err();

    assert!(matches!(err, Error::Publish(_)));
    assert!(h.store.is_new(ARTICLE_URL).await.unwrap());
}

#[tokio::test]
async fn test_unknown_url_has_no_scraper() {
    let h = harness(Some(article_of_length(1200)), false);
    let options = RunOptions {
        url: Some("https://www.example.com/nieuws/1".to_string()),
        force: false,
    };
    let err = h.bot.run(options).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn test_preview_does_not_publish_or_record() {
    let h = harness(Some(article_of_length(1200)), false);
    let preview = h.bot.preview(ARTICLE_URL).await.unwrap();

    assert!(preview.classification.accepted);
    let post = preview.post.unwrap();
    assert_eq!(post.attribution, Attribution::SourceHandle("@ED_Regio".to_string()));
    assert!(!post.image.is_empty());
    assert!(h.publisher.posts.lock().unwrap().is_empty());
    assert!(h.store.is_new(ARTICLE_URL).await.unwrap());
}

#[tokio::test]
async fn test_render_ignores_classification() {
    let h = harness(Some(article_of_length(2500)), false);
    let image = h.bot.render(ARTICLE_URL).await.unwrap();

    let layout = h.rasterizer.layout.lock().unwrap().clone().unwrap();
    assert_eq!(image, layout.height.to_be_bytes().to_vec());
    assert!(h.search.queries.lock().unwrap().is_empty());
    assert!(h.store.is_new(ARTICLE_URL).await.unwrap());
}
