use async_trait::async_trait;
use crate::types::{Caption, PublishResult};
use crate::Result;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Posts the caption together with a PNG image
    async fn publish(&self, caption: &Caption, image: &[u8]) -> Result<PublishResult>;
}
