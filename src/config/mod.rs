//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated)
//!     → FallbackDispatcher::from_config
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → apply_updates swaps the candidate list
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Invalid reloads are logged and dropped

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, with_candidate_overrides, ConfigError};
pub use schema::{ClientConfig, ObservabilityConfig, TimeoutConfig};
pub use validation::ValidationError;
