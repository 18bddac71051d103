//! Tracing subscriber bootstrap.

use crate::config::ExportSettings;
use tracing_subscriber::EnvFilter;

/// Installs a formatted tracing subscriber for the process.
///
/// `RUST_LOG` takes precedence over [`ExportSettings::log_filter`]. Calling
/// this more than once keeps the first subscriber.
pub fn init(settings: &ExportSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
