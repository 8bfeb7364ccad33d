//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::fallback::DEFAULT_CANDIDATE;

/// Root configuration for the panel client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Candidate base addresses in initial priority order.
    pub candidates: Vec<String>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            candidates: vec![DEFAULT_CANDIDATE.to_string()],
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Per-attempt deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Longest wait for any single read, in seconds. Resets whenever
    /// bytes arrive, so slow but steady responses are not cut off.
    pub read_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            read_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "panel_client=info".to_string(),
            json_logs: false,
        }
    }
}
