//! Fallback dispatcher.
//!
//! Tries each candidate in priority order until one completes an HTTP
//! exchange, then moves that candidate to the front of the shared list.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::fallback::candidates::CandidateList;
use crate::fallback::error::{DispatchError, DispatchResult};
use crate::fallback::request::{Exchange, RequestDescriptor};
use crate::fallback::transport::HttpTransport;
use crate::observability::metrics;

/// Domain-fallback request dispatcher.
///
/// Share it behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct FallbackDispatcher {
    candidates: CandidateList,
    transport: HttpTransport,
}

impl FallbackDispatcher {
    pub fn new(candidates: CandidateList, transport: HttpTransport) -> Self {
        Self {
            candidates,
            transport,
        }
    }

    /// Build a dispatcher from the candidate and timeout sections of `config`.
    pub fn from_config(config: &ClientConfig) -> DispatchResult<Self> {
        let transport =
            HttpTransport::from_config(&config.timeouts).map_err(DispatchError::Client)?;
        Ok(Self::new(
            CandidateList::new(config.candidates.iter().cloned()),
            transport,
        ))
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Replace every candidate; an empty list is ignored.
    pub fn replace_all<I, S>(&self, addresses: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates.replace_all(addresses)
    }

    /// Append candidates that are not already present.
    pub fn add_if_absent<I, S>(&self, addresses: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates.add_if_absent(addresses)
    }

    /// Send `request` to the first candidate that completes an exchange.
    ///
    /// Any HTTP status is returned as `Ok`. Only transport failures move on
    /// to the next candidate; when all of them fail, the last failure is
    /// returned.
    pub async fn dispatch(&self, request: &RequestDescriptor) -> DispatchResult<Exchange> {
        let span = tracing::debug_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            method = %request.method(),
            path = %request.path()
        );
        self.dispatch_inner(request).instrument(span).await
    }

    async fn dispatch_inner(&self, request: &RequestDescriptor) -> DispatchResult<Exchange> {
        let snapshot = self.candidates.snapshot();
        let mut last_error = None;

        for (attempt, candidate) in snapshot.iter().enumerate() {
            match self.transport.exchange(candidate, request).await {
                Ok(exchange) => {
                    if self.candidates.promote(candidate) {
                        metrics::record_promotion();
                        tracing::info!(candidate = %candidate, attempt, "Promoted candidate to front");
                    }
                    tracing::debug!(
                        candidate = %candidate,
                        attempt,
                        status = exchange.status,
                        "Exchange completed"
                    );
                    metrics::record_dispatch("completed");
                    return Ok(exchange);
                }
                Err(e) => {
                    tracing::warn!(
                        candidate = %candidate,
                        attempt,
                        error = %e,
                        "Transport failure, trying next candidate"
                    );
                    metrics::record_candidate_failure(candidate);
                    last_error = Some(e);
                }
            }
        }

        metrics::record_dispatch("exhausted");
        match last_error {
            Some(last) => {
                tracing::error!(attempts = snapshot.len(), error = %last, "All candidates failed");
                Err(DispatchError::Exhausted {
                    attempts: snapshot.len(),
                    last,
                })
            }
            None => Err(DispatchError::NoCandidates),
        }
    }

    /// Convenience form of [`dispatch`](Self::dispatch) taking loose parts.
    pub async fn request(
        &self,
        path: &str,
        method: &str,
        headers: &BTreeMap<String, String>,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> DispatchResult<Exchange> {
        let mut descriptor = RequestDescriptor::new(method, path).with_headers(headers.clone());
        if let Some(body) = body {
            descriptor = descriptor.with_body(body, content_type);
        }
        self.dispatch(&descriptor).await
    }

    /// Run a dispatch on its own task and hand back the join handle.
    pub fn spawn_dispatch(
        self: &Arc<Self>,
        request: RequestDescriptor,
    ) -> JoinHandle<DispatchResult<Exchange>> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.dispatch(&request).await })
    }
}
