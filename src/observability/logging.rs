//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick plain or JSON output from configuration
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured filter
//! - Library code only emits events; installing a subscriber is left to
//!   the binary

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Resolve the filter: environment first, configuration second.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let json = config.json_logs;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .try_init()
}
