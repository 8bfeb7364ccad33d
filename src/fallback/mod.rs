//! Domain-fallback request dispatching.
//!
//! # Data Flow
//! ```text
//! RequestDescriptor
//!     → dispatcher.rs (snapshot candidate order)
//!     → for each candidate:
//!         transport.rs (join URL, send, read body with deadlines)
//!         - exchange completed (any status) → promote candidate, return
//!         - transport error → remember it, try the next candidate
//!     → all failed → last transport error
//! ```
//!
//! # Design Decisions
//! - HTTP error statuses are results, not failures; only the transport
//!   layer triggers fallback
//! - One pass over the list per call, no backoff and no cool-down
//! - The candidate list is the only shared mutable state
//!   (see candidates.rs)

pub mod candidates;
pub mod dispatcher;
pub mod error;
pub mod request;
pub mod transport;

pub use candidates::{CandidateList, DEFAULT_CANDIDATE};
pub use dispatcher::FallbackDispatcher;
pub use error::{DispatchError, DispatchResult, TransportError};
pub use request::{join_url, Exchange, RequestDescriptor};
pub use transport::HttpTransport;
