use std::time::Duration;

use async_trait::async_trait;
use cb_core::{Article, Error, Result, Scraper};
use scraper::Html;
use tracing::debug;

use super::utils;
use crate::http_client;

const TITLE_SELECTORS: &[&str] = &["h1.entry-title", "h1[itemprop=headline]"];
const PARAGRAPH_SELECTOR: &str = "div.entry-content p";
const PRELUDE_SELECTOR: &str = "p.prelude";
/// Paragraphs linking off-site are advertisements.
const AD_MARKER: &str = r#"target="_blank""#;

#[derive(Debug, Clone)]
pub struct SoccerNewsScraper {
    client: reqwest::Client,
}

impl SoccerNewsScraper {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(user_agent, timeout)?,
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("GET {} failed: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("GET {} returned {}", url, status)));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("Reading {} failed: {}", url, e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Extracts an article from a SoccerNews page.
///
/// The first content paragraph is the preface; older pages mark it with
/// `p.prelude` instead.
pub fn parse_article(url: &str, html: &str) -> Result<Article> {
    let document = Html::parse_document(html);

    let title = utils::first_text(&document, TITLE_SELECTORS)?
        .ok_or_else(|| Error::Parse(format!("No title found at {}", url)))?;

    let paragraph = utils::selector(PARAGRAPH_SELECTOR)?;
    let mut paragraphs: Vec<String> = document
        .select(&paragraph)
        .filter(|p| !p.inner_html().contains(AD_MARKER))
        .map(utils::element_text)
        .filter(|text| !text.is_empty())
        .collect();

    let preface = if paragraphs.is_empty() {
        utils::first_text(&document, &[PRELUDE_SELECTOR])?
    } else {
        Some(paragraphs.remove(0))
    };
    let preface = preface.ok_or_else(|| Error::Parse(format!("No article content found at {}", url)))?;

    let keywords = utils::meta_content(&document, "keywords")?
        .map(|raw| utils::split_list(&raw))
        .unwrap_or_default();

    debug!(
        "Parsed '{}': {} body paragraphs, {} keywords",
        title,
        paragraphs.len(),
        keywords.len()
    );

    Ok(Article {
        url: url.to_string(),
        title,
        preface,
        body: paragraphs,
        keywords,
    })
}

#[async_trait]
impl Scraper for SoccerNewsScraper {
    fn source(&self) -> &str {
        "SoccerNews"
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("soccernews.nl")
    }

    async fn scrape_article(&self, url: &str) -> Result<Article> {
        let html = self.fetch_html(url).await?;
        parse_article(url, &html)
    }
}
