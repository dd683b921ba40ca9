use async_trait::async_trait;
use cb_core::{ArticleFeed, Error, Result};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::X_API_BASE;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    entities: Option<Entities>,
}

#[derive(Debug, Deserialize)]
struct Entities {
    #[serde(default)]
    urls: Vec<UrlEntity>,
}

#[derive(Debug, Deserialize)]
struct UrlEntity {
    expanded_url: Option<String>,
}

/// Reads the article link from the newest post of an X account.
pub struct TimelineFeed {
    client: reqwest::Client,
    bearer_token: String,
    account: String,
}

impl TimelineFeed {
    pub fn new(client: reqwest::Client, bearer_token: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            client,
            bearer_token: bearer_token.into(),
            account: account.into(),
        }
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Timeline request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("Timeline request returned {}: {}", status, body)));
        }
        response
            .json()
            .await
            .map_err(|e| Error::Decode(format!("Timeline response: {}", e)))
    }
}

/// Extracts the user id from a `GET /2/users/by/username/:name` response.
pub fn parse_user_id(value: serde_json::Value) -> Result<String> {
    let envelope: Envelope<User> = serde_json::from_value(value)?;
    envelope
        .data
        .map(|user| user.id)
        .ok_or_else(|| Error::Fetch("Account not found".to_string()))
}

/// First expanded link of the newest post in a `GET /2/users/:id/tweets`
/// response, normalised through `Url` so non-ASCII paths are percent-encoded.
pub fn parse_latest_link(value: serde_json::Value) -> Result<String> {
    let envelope: Envelope<Vec<Post>> = serde_json::from_value(value)?;
    let newest = envelope
        .data
        .and_then(|posts| posts.into_iter().next())
        .ok_or_else(|| Error::Fetch("Timeline is empty".to_string()))?;
    let link = newest
        .entities
        .and_then(|e| e.urls.into_iter().find_map(|u| u.expanded_url))
        .ok_or_else(|| Error::Fetch("Newest post has no link".to_string()))?;
    Ok(Url::parse(&link)?.to_string())
}

#[async_trait]
impl ArticleFeed for TimelineFeed {
    async fn latest_url(&self) -> Result<String> {
        let lookup = format!("{}/users/by/username/{}", X_API_BASE, self.account);
        let user_id = parse_user_id(self.get_json(&lookup, &[]).await?)?;
        debug!("Resolved @{} to user {}", self.account, user_id);

        let timeline = format!("{}/users/{}/tweets", X_API_BASE, user_id);
        let query = [
            ("max_results", "5"),
            ("exclude", "replies,retweets"),
            ("tweet.fields", "entities"),
        ];
        parse_latest_link(self.get_json(&timeline, &query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_user_id() {
        let value = json!({"data": {"id": "2244994945", "name": "SoccerNews", "username": "Soccernews_nl"}});
        assert_eq!(parse_user_id(value).unwrap(), "2244994945");
        assert!(matches!(parse_user_id(json!({"errors": []})), Err(Error::Fetch(_))));
    }

    #[test]
    fn test_parse_latest_link() {
        let value = json!({
            "data": [
                {
                    "id": "1",
                    "text": "Ajax legt middenvelder vast https://t.co/abc",
                    "entities": {"urls": [{
                        "url": "https://t.co/abc",
                        "expanded_url": "https://www.soccernews.nl/news/812345/ajax-legt-middenvelder-vast"
                    }]}
                },
                {"id": "0", "text": "ouder bericht"}
            ],
            "meta": {"result_count": 2}
        });
        assert_eq!(
            parse_latest_link(value).unwrap(),
            "https://www.soccernews.nl/news/812345/ajax-legt-middenvelder-vast"
        );
    }

    #[test]
    fn test_non_ascii_link_is_encoded() {
        let value = json!({"data": [{"id": "1", "entities": {"urls": [
            {"expanded_url": "https://www.soccernews.nl/news/1/één-doelpunt"}
        ]}}]});
        let link = parse_latest_link(value).unwrap();
        assert!(link.is_ascii());
        assert!(link.ends_with("/news/1/%C3%A9%C3%A9n-doelpunt"));
    }

    #[test]
    fn test_post_without_link() {
        let value = json!({"data": [{"id": "1", "text": "Goedemorgen!"}]});
        assert!(matches!(parse_latest_link(value), Err(Error::Fetch(_))));
        assert!(matches!(parse_latest_link(json!({"meta": {}})), Err(Error::Fetch(_))));
    }
}
