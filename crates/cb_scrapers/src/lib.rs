//! Network-facing collaborators: the article scraper, the X timeline feed,
//! Google search, publishers, and logging setup.

pub mod feed;
pub mod logging;
pub mod publish;
pub mod scrapers;
pub mod search;

use std::time::Duration;

use cb_core::{Error, Result};

pub use feed::TimelineFeed;
pub use logging::init_logging;
pub use publish::{DryRunPublisher, XPublisher};
pub use scrapers::SoccerNewsScraper;
pub use search::GoogleSearch;

/// Base URL of the X API v2.
pub const X_API_BASE: &str = "https://api.x.com/2";

/// HTTP client shared by the collaborators, with a request timeout.
pub fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}
