//! Tracing initialization.
//!
//! Sets up a tracing-subscriber registry with an env filter and a fmt layer
//! on stderr, so stdout stays free for command output.

pub mod store;

use crate::error::{Error, Result};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. "info") applies.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber was already set.
pub fn init_tracing(default_level: &str) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|e| Error::Config(format!("invalid log level {default_level:?}: {e}")))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))
}
