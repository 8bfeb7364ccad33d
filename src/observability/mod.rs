//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher / api / config watcher produce:
//!     → tracing events (one span per dispatch, keyed by dispatch_id)
//!     → metrics.rs (counters through the `metrics` facade)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, plain or JSON)
//!     → whatever metrics recorder the embedding application installs
//! ```

pub mod logging;
pub mod metrics;
