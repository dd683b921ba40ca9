pub mod error;
pub mod publish;
pub mod render;
pub mod search;
pub mod source;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use publish::Publisher;
pub use render::{FontMetrics, FontSet, Rasterizer};
pub use search::ArticleSearch;
pub use source::{ArticleFeed, Scraper};
pub use storage::SeenUrlStore;
pub use types::{
    Article, Attribution, Caption, ClassificationResult, FontRole, HashtagTable, ImageLayout,
    PublishResult, RejectReason, Rgb, SearchHit, TextBlock, WrappedText,
};
