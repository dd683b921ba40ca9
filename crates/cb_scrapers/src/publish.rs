use std::path::PathBuf;

use async_trait::async_trait;
use cb_core::{Caption, Error, PublishResult, Publisher, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::X_API_BASE;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// Posts the caption with the image attached through the X API v2.
pub struct XPublisher {
    client: reqwest::Client,
    user_token: String,
}

impl XPublisher {
    pub fn new(client: reqwest::Client, user_token: impl Into<String>) -> Self {
        Self {
            client,
            user_token: user_token.into(),
        }
    }

    async fn send(&self, step: &str, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .bearer_auth(&self.user_token)
            .send()
            .await
            .map_err(|e| Error::Publish(format!("{} failed: {}", step, e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Publish(format!("{} failed: {}", step, e)))?;
        if !status.is_success() {
            return Err(Error::Publish(format!("{} returned {}: {}", step, status, body)));
        }
        created_id(&body).map_err(|e| Error::Publish(format!("{}: {}", step, e)))
    }

    async fn upload_media(&self, image: &[u8]) -> Result<String> {
        let part = Part::bytes(image.to_vec())
            .file_name("out.png")
            .mime_str("image/png")
            .map_err(|e| Error::Publish(format!("Media upload failed: {}", e)))?;
        let form = Form::new().text("media_category", "tweet_image").part("media", part);
        let request = self
            .client
            .post(format!("{}/media/upload", X_API_BASE))
            .multipart(form);
        self.send("Media upload", request).await
    }
}

/// Id of the object created by an X API v2 call (`{"data": {"id": ...}}`).
pub fn created_id(body: &str) -> Result<String> {
    let envelope: Envelope<Created> = serde_json::from_str(body)?;
    Ok(envelope.data.id)
}

#[async_trait]
impl Publisher for XPublisher {
    fn name(&self) -> &str {
        "X"
    }

    async fn publish(&self, caption: &Caption, image: &[u8]) -> Result<PublishResult> {
        let media_id = self.upload_media(image).await?;
        debug!("Uploaded media {}", media_id);

        let request = self
            .client
            .post(format!("{}/tweets", X_API_BASE))
            .json(&json!({
                "text": caption.as_str(),
                "media": {"media_ids": [media_id]},
            }));
        let id = self.send("Post creation", request).await?;
        let url = format!("https://x.com/i/web/status/{}", id);
        info!("🐦 Posted {}", url);

        Ok(PublishResult {
            id: Some(id),
            url: Some(url),
        })
    }
}

/// Writes the image to disk and logs the caption instead of posting.
pub struct DryRunPublisher {
    output_path: PathBuf,
    marker: String,
}

impl DryRunPublisher {
    pub fn new(output_path: impl Into<PathBuf>, marker: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            marker: marker.into(),
        }
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    fn name(&self) -> &str {
        "dry run"
    }

    async fn publish(&self, caption: &Caption, image: &[u8]) -> Result<PublishResult> {
        tokio::fs::write(&self.output_path, image).await?;
        info!("💾 Image written to {}", self.output_path.display());
        info!("📝 Caption:\n{}", caption.without_marker(&self.marker));
        Ok(PublishResult {
            id: None,
            url: Some(self.output_path.display().to_string()),
        })
    }
}
