//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Candidates must be absolute http/https URLs
//! - Timeouts must be non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("candidate list is empty")]
    NoCandidates,

    #[error("candidate #{0} is blank")]
    BlankCandidate(usize),

    #[error("candidate '{candidate}' is not a valid URL: {reason}")]
    InvalidCandidate { candidate: String, reason: String },

    #[error("candidate '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.candidates.is_empty() {
        errors.push(ValidationError::NoCandidates);
    }

    for (index, candidate) in config.candidates.iter().enumerate() {
        if candidate.trim().is_empty() {
            errors.push(ValidationError::BlankCandidate(index));
            continue;
        }
        match Url::parse(candidate) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => errors.push(ValidationError::UnsupportedScheme(candidate.clone())),
            Err(e) => errors.push(ValidationError::InvalidCandidate {
                candidate: candidate.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.read_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("read_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
