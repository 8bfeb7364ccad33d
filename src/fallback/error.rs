//! Dispatcher error types.

use thiserror::Error;

/// A single attempt against one candidate could not complete.
///
/// Every variant makes the dispatcher move on to the next candidate.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Candidate base joined with the path is not a valid URL.
    #[error("invalid target address '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Method is not a valid HTTP token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// Header name or value cannot be sent.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    /// Connect or request deadline elapsed.
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connection refused, DNS failure, TLS failure, broken body, ...
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// Sort a reqwest failure into timeout or generic request failure.
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if is_reqwest_timeout(&source) {
            TransportError::Timeout {
                url: url.to_string(),
                source,
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Read timeouts may only show up as `io::ErrorKind::TimedOut` in the
/// source chain.
fn is_reqwest_timeout(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = inner.source();
    }
    false
}

/// Errors returned by the fallback dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every candidate failed at the transport level.
    #[error("all {attempts} candidates failed, last error: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: TransportError,
    },

    /// There was nothing to try.
    #[error("no candidate responded")]
    NoCandidates,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DispatchError {
    /// The transport error observed on the final attempt, if any.
    pub fn last_transport_error(&self) -> Option<&TransportError> {
        match self {
            DispatchError::Exhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
