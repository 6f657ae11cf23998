use std::fmt;

use shared::domain::Domain;
use thiserror::Error;

/// Failure of a single request to the inference service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("invalid inference service url: {0}")]
    InvalidUrl(String),
    #[error("inference service unreachable for {domain}: {reason}")]
    Unreachable { domain: Domain, reason: String },
    #[error("inference service rejected {domain} request with status {status}")]
    Status { domain: Domain, status: u16 },
    #[error("malformed {domain} response: {reason}")]
    Malformed { domain: Domain, reason: String },
}

impl InferenceError {
    pub fn domain(&self) -> Option<Domain> {
        match self {
            InferenceError::InvalidUrl(_) => None,
            InferenceError::Unreachable { domain, .. }
            | InferenceError::Status { domain, .. }
            | InferenceError::Malformed { domain, .. } => Some(*domain),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainFailure {
    pub domain: Domain,
    pub error: InferenceError,
}

/// A dashboard batch in which at least one of the four requests failed.
///
/// Partial failures are reported the same way as a fully unreachable service.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct BatchError {
    failures: Vec<DomainFailure>,
}

impl BatchError {
    pub fn new(failures: Vec<DomainFailure>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[DomainFailure] {
        &self.failures
    }

    pub fn failed_domains(&self) -> Vec<Domain> {
        self.failures.iter().map(|failure| failure.domain).collect()
    }

    /// Some requests of the batch succeeded, but their results were not applied.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && self.failures.len() < Domain::ALL.len()
    }

    pub fn user_message(&self) -> &'static str {
        "Failed to load data. Please make sure the inference service is running."
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} inference requests failed",
            self.failures.len(),
            Domain::ALL.len()
        )?;
        for failure in &self.failures {
            write!(f, "; {}", failure.error)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to the inference service: {0}")]
    Probe(#[source] InferenceError),
    #[error("failed to encode inputs: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to persist inputs: {0:#}")]
    Persist(#[source] anyhow::Error),
}
