//! Logging setup.

use crate::LoggingConfig;
use docpane_error::{ConfigError, DocpaneResult};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so that
/// command output on stdout stays machine-readable. Calling this twice keeps
/// the first subscriber.
pub fn init_logging(config: &LoggingConfig) -> DocpaneResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level()))
        .map_err(|e| ConfigError::new(format!("Invalid log level {}: {}", config.level(), e)))?;

    let fmt_layer = if *config.json() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Subscriber already installed, keeping it");
    }
    Ok(())
}
