use std::path::Path;

use cb_core::{Error, HashtagTable, Result};
use tracing::{info, warn};

/// Reads the keyword to hashtag mapping from a JSON object file.
///
/// A missing file yields an empty table; a malformed one is an error.
pub fn load_hashtags(path: &Path) -> Result<HashtagTable> {
    if !path.exists() {
        warn!("⚠️ No hashtag table at {}, captions get no hashtags", path.display());
        return Ok(HashtagTable::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let table: HashtagTable = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("Invalid hashtag table {}: {}", path.display(), e)))?;
    info!("🏷️ Loaded {} hashtags", table.len());
    Ok(table)
}
