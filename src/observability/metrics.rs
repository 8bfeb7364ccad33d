//! Dispatch metrics.
//!
//! # Metrics
//! - `panel_client_dispatch_total` (counter): dispatches by outcome
//!   (`completed`, `exhausted`)
//! - `panel_client_candidate_failures_total` (counter): transport failures
//!   by candidate
//! - `panel_client_promotions_total` (counter): candidates moved to front
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! these calls are no-ops.

/// Record the outcome of one dispatch.
pub fn record_dispatch(outcome: &'static str) {
    ::metrics::counter!("panel_client_dispatch_total", "outcome" => outcome).increment(1);
}

/// Record a transport failure against a candidate.
pub fn record_candidate_failure(candidate: &str) {
    ::metrics::counter!(
        "panel_client_candidate_failures_total",
        "candidate" => candidate.to_string()
    )
    .increment(1);
}

/// Record a promotion to the front of the candidate list.
pub fn record_promotion() {
    ::metrics::counter!("panel_client_promotions_total").increment(1);
}
