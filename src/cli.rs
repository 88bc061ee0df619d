use crate::config;
use anyhow::Result;
use std::path::Path;

/// Load configuration, set up logging and run the terminal widget.
///
/// An optional first argument names a config file to use instead of the
/// default one.
pub async fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => config::load_from(Path::new(&path))?,
        None => config::load_or_create_config()?,
    };

    let _log_guard = crate::logging::init(&config)?;
    tracing::info!(find = %config.endpoints.find, "starting widget");

    crate::tui::run(config).await
}
