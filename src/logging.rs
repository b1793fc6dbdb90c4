//! Sets up the `tracing` subscriber used by the binaries.

use std::{fs::OpenOptions, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{Config, Error};

/// The log level used when `RUST_LOG` is not set.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

/// Install a global subscriber that logs to stdout and, if
/// [Config::log_file] is set, appends debug level logs to that file.
///
/// The stdout level is controlled by `RUST_LOG` and defaults to `info`.
///
/// # Errors
/// Returns an [Error::LoggingError] if the log file cannot be opened or a
/// global subscriber has already been installed.
pub fn setup_logging(config: &Config) -> Result<(), Error> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(DEFAULT_LOG_LEVEL.into())
        .from_env_lossy();
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(env_filter);

    let debug_log = match &config.log_file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|error| {
                    Error::LoggingError(format!("could not open {}: {error}", path.display()))
                })?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .try_init()
        .map_err(|error| Error::LoggingError(error.to_string()))
}
