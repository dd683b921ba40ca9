pub mod attribution;
pub mod bot;
pub mod caption;
pub mod classify;
pub mod config;
pub mod hashtags;
pub mod layout;
pub mod wrap;

use std::future::Future;
use std::time::Duration;

use cb_core::{Error, Result};

pub use attribution::{AttributionConfig, AttributionResolver, SourceEntry};
pub use bot::{Bot, Collaborators, Post, Preview, RunOptions, RunOutcome};
pub use caption::{CaptionComposer, CaptionConfig};
pub use classify::{Classifier, ClassifierConfig};
pub use config::{load_config, BotConfig};
pub use hashtags::load_hashtags;
pub use layout::{FontConfig, FontsConfig, LayoutConfig, LayoutRenderer};
pub use wrap::{wrap, wrap_paragraphs};

/// Bounds a collaborator call; running out of time becomes `Error::Timeout`.
pub(crate) async fn with_timeout<T, F>(operation: &str, duration: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::timeout(operation, duration)),
    }
}
