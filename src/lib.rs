//! Panel API client with domain fallback.
//!
//! Every request goes through a [`FallbackDispatcher`], which tries a
//! shared, prioritized list of base addresses and moves whichever one
//! answers to the front for the next call.

pub mod api;
pub mod config;
pub mod fallback;
pub mod observability;

pub use api::PanelClient;
pub use config::ClientConfig;
pub use fallback::FallbackDispatcher;
