//! Bot configuration, loaded from a TOML file.
//!
//! Every field has a default; the defaults are tuned for SoccerNews.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cb_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::attribution::AttributionConfig;
use crate::caption::CaptionConfig;
use crate::classify::ClassifierConfig;
use crate::layout::LayoutConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 6.1; Win64; x64; rv:25.0)".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Account whose newest post links the article to process
    pub account: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            account: "Soccernews_nl".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `file` or `memory`
    pub kind: String,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: "file".to_string(),
            path: PathBuf::from("saved_url.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub classifier: ClassifierConfig,
    pub attribution: AttributionConfig,
    pub caption: CaptionConfig,
    pub layout: LayoutConfig,
    pub http: HttpConfig,
    pub feed: FeedConfig,
    pub storage: StorageConfig,
    pub hashtags_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            attribution: AttributionConfig::default(),
            caption: CaptionConfig::default(),
            layout: LayoutConfig::default(),
            http: HttpConfig::default(),
            feed: FeedConfig::default(),
            storage: StorageConfig::default(),
            hashtags_path: PathBuf::from("hashtags.json"),
            output_path: PathBuf::from("out.png"),
        }
    }
}

impl BotConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::Config("http.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Loads the configuration, falling back to defaults when the file is absent.
///
/// A file that exists but does not parse is an error.
pub fn load_config(path: &Path) -> Result<BotConfig> {
    if !path.exists() {
        warn!("⚠️ No config at {}, using defaults", path.display());
        return Ok(BotConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    BotConfig::from_toml(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}
