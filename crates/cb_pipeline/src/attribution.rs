//! Best-effort lookup of where an article's story originally came from.
//!
//! Journalists win over outlets. When only an outlet is mentioned, quotes
//! from the body are searched on the web to find the original piece; the
//! outlet's handle is the fallback.

use std::sync::Arc;
use std::time::Duration;

use cb_core::{Article, ArticleSearch, Attribution, Error, Result};
use chrono::Local;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::with_timeout;

const QUOTE_PATTERN: &str = r#""([^"]+)"|“([^”]+)”"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub name: String,
    pub handle: String,
}

impl SourceEntry {
    pub fn new(name: &str, handle: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: handle.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Checked first, in order
    pub journalists: Vec<SourceEntry>,
    /// Checked when no journalist is mentioned, in order
    pub outlets: Vec<SourceEntry>,
    pub max_quote_words: usize,
    pub min_quote_words: usize,
    /// Only accept search hits published on the current local date
    pub require_published_today: bool,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            journalists: vec![
                SourceEntry::new("Rik Elfrink", "@RikElfrink"),
                SourceEntry::new("Mike Verweij", "@MikeVerweij"),
                SourceEntry::new("Krabbendam", "@Mkrabby"),
                SourceEntry::new("Fabrizio Romano", "@FabrizioRomano"),
            ],
            outlets: vec![
                SourceEntry::new("Algemeen Dagblad", "@ADnl"),
                SourceEntry::new("Voetbal International", "@VI_nl"),
                SourceEntry::new("Telegraaf", "@telegraaf"),
                SourceEntry::new("Eindhovens Dagblad", "@ED_Regio"),
                SourceEntry::new("ESPN", "@ESPNnl"),
                SourceEntry::new("Parool", "@parool"),
                SourceEntry::new("RTV Rijnmond", "@RTV_Rijnmond"),
                SourceEntry::new("De Gelderlander", "@DeGelderlander"),
                SourceEntry::new("NOS", "@NOSsport"),
                SourceEntry::new("NU.nl", "@NUnl"),
                SourceEntry::new("NRC", "@nrc"),
            ],
            max_quote_words: 32,
            min_quote_words: 10,
            require_published_today: false,
        }
    }
}

pub struct AttributionResolver {
    config: AttributionConfig,
    search: Arc<dyn ArticleSearch>,
    timeout: Duration,
    quotes: Regex,
}

impl AttributionResolver {
    pub fn new(config: AttributionConfig, search: Arc<dyn ArticleSearch>) -> Result<Self> {
        let quotes = Regex::new(QUOTE_PATTERN)
            .map_err(|e| Error::Config(format!("Invalid quote pattern: {}", e)))?;
        Ok(Self {
            config,
            search,
            timeout: Duration::from_secs(30),
            quotes,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn resolve(&self, article: &Article) -> Attribution {
        let haystack = article.full_text();

        if let Some(journalist) = find_source(&self.config.journalists, &haystack) {
            info!("🖋️ Attributed to journalist {}", journalist.name);
            return Attribution::SourceHandle(journalist.handle.clone());
        }

        let Some(outlet) = find_source(&self.config.outlets, &haystack) else {
            debug!("No known source mentioned in {}", article.url);
            return Attribution::None;
        };
        info!("📰 Article mentions {}, searching for the original", outlet.name);

        for quote in self.extract_quotes(&article.body_text()) {
            let Some(query) = self.build_query(&quote) else {
                continue;
            };
            match with_timeout("search", self.timeout, self.search_query(&query)).await {
                Ok(Some(link)) => {
                    info!("🔗 Found original article: {}", link);
                    return Attribution::SourceLink(link);
                }
                Ok(None) => debug!("No usable search result for {}", query),
                Err(e) => warn!("⚠️ Search failed, trying next quote: {}", e),
            }
        }

        Attribution::SourceHandle(outlet.handle.clone())
    }

    /// Quoted spans in order of appearance, straight or curly quotes.
    pub fn extract_quotes(&self, text: &str) -> Vec<String> {
        self.quotes
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Search query for a quote, or `None` if it is too short to be meaningful.
    pub fn build_query(&self, quote: &str) -> Option<String> {
        let words: Vec<&str> = quote
            .split_whitespace()
            .take(self.config.max_quote_words)
            .collect();
        if words.len() < self.config.min_quote_words {
            return None;
        }
        Some(format!("\"{}\"", words.join(" ")))
    }

    async fn search_query(&self, query: &str) -> Result<Option<Url>> {
        let hits = self.search.search(query).await?;
        let Some(first) = hits.into_iter().next() else {
            return Ok(None);
        };

        if self.config.require_published_today {
            let today = Local::now().date_naive();
            if first.published_at != Some(today) {
                debug!("Skipping {}: not published today", first.link);
                return Ok(None);
            }
        }

        Ok(Some(first.link))
    }
}

fn find_source<'a>(table: &'a [SourceEntry], haystack: &str) -> Option<&'a SourceEntry> {
    table.iter().find(|entry| haystack.contains(&entry.name))
}
