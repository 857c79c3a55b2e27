//! Tracing setup, in the teacher's `tracing-subscriber` shape. The pipeline
//! itself never calls this — it is provided for embedding applications that
//! want the same structured-logging behavior the rest of the corpus ships.

use crate::config::LoggingConfig;
use crate::errors::{CitationError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a global `tracing` subscriber at the configured level, optionally
/// emitting JSON-formatted records.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let level: tracing::Level = config
        .level
        .parse()
        .map_err(|_| CitationError::Internal(format!("invalid log level: {}", config.level)))?;

    let filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    if config.json_format {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json().with_filter(filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_filter(filter))
            .init();
    }

    tracing::info!("logging initialized at level {}", config.level);
    Ok(())
}
