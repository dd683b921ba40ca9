use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use cb_core::Result;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INIT: Once = Once::new();

/// Logs to stdout and, when `log_file` is given, appends the same events
/// without colours to that file.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(level: Level, log_file: Option<&Path>) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let file = match log_file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    INIT.call_once(|| {
        let file_layer = file.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });
        let installed = tracing_subscriber::registry()
            .with(LevelFilter::from_level(level))
            .with(tracing_subscriber::fmt::layer())
            .with(file_layer)
            .try_init();
        if let Err(e) = installed {
            eprintln!("Failed to install the log subscriber: {}", e);
        }
    });
    Ok(())
}
