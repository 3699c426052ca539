use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::infra::config::{Config, ConfigWarnings, ListTimeoutSource};

const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Filter read from `RUST_LOG`, falling back to the default directives.
///
/// Reads the process environment at call time, so `.env` must already be
/// loaded for its `RUST_LOG` to take effect.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber. Call after configuration is loaded.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn log_config(config: &Config, warnings: &ConfigWarnings) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    match &config.metadata.config_path {
        Some(path) => info!(path = %path.display(), "configuration file loaded"),
        None => info!("no configuration file in use"),
    }

    let list_timeout_source = match config.metadata.list_timeout_source {
        ListTimeoutSource::Env => "LIST_TIMEOUT",
        ListTimeoutSource::WriteTimeoutFallback => "WRITE_TIMEOUT",
        ListTimeoutSource::File => "config file",
        ListTimeoutSource::Default => "default",
    };
    info!(
        store = %config.store.redacted_url(),
        list_timeout = %humantime::format_duration(config.store.list_timeout),
        list_timeout_source,
        max_connections = config.store.max_connections,
        "store settings"
    );

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}
