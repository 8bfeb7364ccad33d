//! Panel API glue.
//!
//! # Data Flow
//! ```text
//! login(credentials) / status(token)
//!     → client.rs (JSON body, headers)
//!     → FallbackDispatcher::dispatch
//!     → client.rs (status code + JSON interpretation)
//!     → SessionToken / StatusResponse / ApiError
//! ```
//!
//! # Design Decisions
//! - The panel exposes only a login call; status re-uses it
//! - Endpoints the panel lacks succeed locally without network I/O

pub mod client;
pub mod types;

pub use client::{PanelClient, LOGIN_PATH};
pub use types::{ApiError, ApiResult, Credentials, SessionToken, StatusResponse};
