use std::path::Path;
use std::sync::Arc;

use cb_core::{Error, Result, SeenUrlStore};
use tracing::info;

pub mod backends;

pub use backends::*;

/// Builds the seen-URL store named in the configuration.
pub fn create_store(kind: &str, path: &Path) -> Result<Arc<dyn SeenUrlStore>> {
    let store: Arc<dyn SeenUrlStore> = match kind {
        "file" => Arc::new(FileStore::new(path)),
        "memory" => Arc::new(MemoryStore::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown storage kind: {} (expected file or memory)",
                other
            )))
        }
    };
    info!("💾 Seen-URL store ready (using {})", kind);
    Ok(store)
}
