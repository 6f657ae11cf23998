//! Concurrent four-domain fetch and the loading / ready / failed state machine.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use shared::domain::{Domain, InputSnapshot};
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::{
    error::{BatchError, DomainFailure, InferenceError},
    inference::InferenceClient,
    results::{DashboardSummary, DomainResults},
    session::FormSession,
};

/// Monotonic tag of one `load_all` call. Only the latest issued batch may change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(u64);

impl BatchId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Idle,
    Loading {
        batch: BatchId,
        previous: Option<Arc<DomainResults>>,
    },
    Ready {
        batch: BatchId,
        results: Arc<DomainResults>,
        inputs: Arc<InputSnapshot>,
    },
    /// `previous` is kept for the next refresh but never shown alongside the error.
    Failed {
        batch: BatchId,
        error: BatchError,
        previous: Option<Arc<DomainResults>>,
    },
}

impl DashboardState {
    pub fn batch(&self) -> Option<BatchId> {
        match self {
            DashboardState::Idle => None,
            DashboardState::Loading { batch, .. }
            | DashboardState::Ready { batch, .. }
            | DashboardState::Failed { batch, .. } => Some(*batch),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading { .. })
    }

    /// Results that may be displayed: present only while `Ready`.
    pub fn results(&self) -> Option<&Arc<DomainResults>> {
        match self {
            DashboardState::Ready { results, .. } => Some(results),
            _ => None,
        }
    }

    /// Last successful results, including ones hidden behind a loading or error view.
    pub fn retained_results(&self) -> Option<Arc<DomainResults>> {
        match self {
            DashboardState::Idle => None,
            DashboardState::Ready { results, .. } => Some(results.clone()),
            DashboardState::Loading { previous, .. } | DashboardState::Failed { previous, .. } => {
                previous.clone()
            }
        }
    }

    pub fn error(&self) -> Option<&BatchError> {
        match self {
            DashboardState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Loading { batch: BatchId },
    Ready { batch: BatchId, summary: DashboardSummary },
    Failed { batch: BatchId, message: String },
    Discarded { batch: BatchId, latest: BatchId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Applied(Arc<DomainResults>),
    /// A newer batch was issued while this one was in flight; its completion was ignored.
    Superseded { batch: BatchId, latest: BatchId },
}

pub struct DashboardOrchestrator {
    client: Arc<dyn InferenceClient>,
    issued: AtomicU64,
    state: RwLock<DashboardState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl DashboardOrchestrator {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        let (events, _) = broadcast::channel(1024);
        Self {
            client,
            issued: AtomicU64::new(0),
            state: RwLock::new(DashboardState::Idle),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    fn latest_batch(&self) -> BatchId {
        BatchId(self.issued.load(Ordering::SeqCst))
    }

    fn emit(&self, event: DashboardEvent) {
        let _ = self.events.send(event);
    }

    /// Restores the session and issues exactly one batch with its snapshot.
    pub async fn start(&self, session: &mut FormSession) -> Result<BatchOutcome, BatchError> {
        session.load().await;
        self.load_all(session.dashboard_snapshot()).await
    }

    /// Re-issues the batch for the session's current dashboard inputs.
    pub async fn retry(&self, session: &FormSession) -> Result<BatchOutcome, BatchError> {
        self.load_all(session.dashboard_snapshot()).await
    }

    /// Fetches all four domains concurrently and applies them together, or not at all.
    ///
    /// Returns `Err` only when this batch was still the latest one and at least one request
    /// failed.
    pub async fn load_all(&self, inputs: Arc<InputSnapshot>) -> Result<BatchOutcome, BatchError> {
        let batch = {
            let mut state = self.state.write().await;
            let batch = BatchId(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
            let previous = state.retained_results();
            *state = DashboardState::Loading { batch, previous };
            batch
        };
        info!(%batch, "loading dashboard");
        self.emit(DashboardEvent::Loading { batch });

        let fetched = fetch_all(self.client.as_ref(), &inputs).await;

        let mut state = self.state.write().await;
        let latest = self.latest_batch();
        if batch != latest {
            info!(%batch, %latest, "discarding superseded dashboard batch");
            self.emit(DashboardEvent::Discarded { batch, latest });
            return Ok(BatchOutcome::Superseded { batch, latest });
        }

        match fetched {
            Ok(results) => {
                let results = Arc::new(results);
                let summary = results.summary(inputs.nutrition.goal);
                *state = DashboardState::Ready {
                    batch,
                    results: results.clone(),
                    inputs,
                };
                info!(%batch, readiness = %summary.readiness_label, "dashboard ready");
                self.emit(DashboardEvent::Ready { batch, summary });
                Ok(BatchOutcome::Applied(results))
            }
            Err(error) => {
                let previous = state.retained_results();
                warn!(%batch, failed = ?error.failed_domains(), error = %error, "dashboard batch failed");
                *state = DashboardState::Failed {
                    batch,
                    error: error.clone(),
                    previous,
                };
                self.emit(DashboardEvent::Failed {
                    batch,
                    message: error.user_message().to_string(),
                });
                Err(error)
            }
        }
    }
}

async fn fetch_all(
    client: &dyn InferenceClient,
    inputs: &InputSnapshot,
) -> Result<DomainResults, BatchError> {
    let (readiness, body_composition, strength, nutrition) = futures::join!(
        client.readiness(&inputs.readiness),
        client.body_composition(&inputs.body_composition),
        client.one_rep_max(&inputs.strength),
        client.nutrition(&inputs.nutrition),
    );

    let mut failures = Vec::new();
    let readiness = keep(Domain::Readiness, readiness, &mut failures);
    let body_composition = keep(Domain::BodyComposition, body_composition, &mut failures);
    let strength = keep(Domain::Strength, strength, &mut failures);
    let nutrition = keep(Domain::Nutrition, nutrition, &mut failures);

    match (readiness, body_composition, strength, nutrition) {
        (Some(readiness), Some(body_composition), Some(strength), Some(nutrition)) => {
            Ok(DomainResults {
                readiness,
                body_composition,
                strength,
                nutrition,
            })
        }
        _ => Err(BatchError::new(failures)),
    }
}

fn keep<T>(
    domain: Domain,
    result: Result<T, InferenceError>,
    failures: &mut Vec<DomainFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            failures.push(DomainFailure { domain, error });
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
