//! Tracing subscriber bootstrap

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `config.level`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(config.ansi))
        .try_init()
        .map_err(|e| Error::Internal(format!("Tracing already initialised: {}", e)))
}
