//! File-backed tracing setup. The terminal belongs to the UI, so log
//! output goes to `<cache>/notefind/notefind.log`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "NOTEFIND_LOG";

pub fn log_path() -> PathBuf {
    let cache_base = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(shellexpand::tilde("~/.cache").into_owned()));
    cache_base.join("notefind").join("notefind.log")
}

/// Install the global subscriber. `default_filter` is used when
/// `NOTEFIND_LOG` is unset or invalid.
pub fn init(default_filter: &str) -> std::io::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, re-entry) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    Ok(path)
}
