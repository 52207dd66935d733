use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::DVError;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// The terminal is owned by the ui, so log lines only go to `log_file`. Without
/// one, events are filtered but not written anywhere. `RUST_LOG` overrides the
/// default level.
pub fn init(log_file: Option<&Path>) -> Result<(), DVError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| DVError::Logging(e.to_string()))
}
