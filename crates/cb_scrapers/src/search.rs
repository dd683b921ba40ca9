use std::collections::HashMap;

use async_trait::async_trait;
use cb_core::{ArticleSearch, Error, Result, SearchHit};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

const ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const PUBLISHED_TIME: &str = "article:published_time";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
    #[serde(default)]
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(default)]
    metatags: Vec<HashMap<String, serde_json::Value>>,
}

impl SearchItem {
    fn published_at(&self) -> Option<NaiveDate> {
        let raw = self.pagemap.as_ref()?.metatags.first()?.get(PUBLISHED_TIME)?.as_str()?;
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// Google Custom Search JSON API client.
pub struct GoogleSearch {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
}

impl GoogleSearch {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }
}

/// Turns a search response body into hits, in ranking order.
///
/// Items whose link is not a valid URL are dropped.
pub fn parse_hits(body: &str) -> Result<Vec<SearchHit>> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| Error::Search(format!("Malformed search response: {}", e)))?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let published_at = item.published_at();
            match Url::parse(&item.link) {
                Ok(link) => Some(SearchHit { link, published_at }),
                Err(e) => {
                    debug!("Skipping search result {}: {}", item.link, e);
                    None
                }
            }
        })
        .collect())
}

#[async_trait]
impl ArticleSearch for GoogleSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        info!("🔍 Searching for the source of the quote");
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[("key", self.api_key.as_str()), ("cx", self.engine_id.as_str()), ("q", query)])
            .send()
            .await
            .map_err(|e| Error::Search(format!("Search request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Search(format!("Reading search response failed: {}", e)))?;
        if !status.is_success() {
            return Err(Error::Search(format!("Search returned {}: {}", status, body)));
        }
        let hits = parse_hits(&body)?;
        debug!("Search returned {} hits", hits.len());
        Ok(hits)
    }
}
