//! Wizard state for the four input groups and persistence of the submitted snapshot.

use std::sync::Arc;

use shared::domain::{
    BodyCompositionInput, Domain, InputSnapshot, NutritionInput, ReadinessInput, StrengthInput,
};
use tracing::{info, warn};

use crate::{error::SessionError, inference::InferenceClient, store::KeyValueStore};

pub const INPUTS_STORAGE_KEY: &str = "fitnessInputs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing loaded yet.
    Empty,
    Editing,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    NothingStored,
    Malformed,
    StoreUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Restored(Arc<InputSnapshot>),
    Defaulted(DefaultReason),
}

impl LoadOutcome {
    pub fn restored(&self) -> Option<&Arc<InputSnapshot>> {
        match self {
            LoadOutcome::Restored(snapshot) => Some(snapshot),
            LoadOutcome::Defaulted(_) => None,
        }
    }
}

pub struct FormSession {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    phase: SessionPhase,
    draft: InputSnapshot,
    submitted: Option<Arc<InputSnapshot>>,
    active_tab: Domain,
    last_error: Option<String>,
}

impl FormSession {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_storage_key(store, INPUTS_STORAGE_KEY)
    }

    pub fn with_storage_key(store: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            phase: SessionPhase::Empty,
            draft: InputSnapshot::default(),
            submitted: None,
            active_tab: Domain::Readiness,
            last_error: None,
        }
    }

    /// Restores the last submitted snapshot, or starts editing from defaults.
    ///
    /// Unreadable or undecodable records are never surfaced; they fall back to defaults.
    pub async fn load(&mut self) -> LoadOutcome {
        let raw = match self.store.get(&self.storage_key).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %self.storage_key, error = %format!("{err:#}"), "failed to read stored inputs");
                return self.start_from_defaults(DefaultReason::StoreUnavailable);
            }
        };
        let Some(raw) = raw else {
            return self.start_from_defaults(DefaultReason::NothingStored);
        };

        match serde_json::from_str::<InputSnapshot>(&raw) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                info!(key = %self.storage_key, "restored submitted inputs");
                self.draft = (*snapshot).clone();
                self.submitted = Some(snapshot.clone());
                self.phase = SessionPhase::Submitted;
                LoadOutcome::Restored(snapshot)
            }
            Err(err) => {
                warn!(key = %self.storage_key, error = %err, "discarding malformed stored inputs");
                self.start_from_defaults(DefaultReason::Malformed)
            }
        }
    }

    fn start_from_defaults(&mut self, reason: DefaultReason) -> LoadOutcome {
        self.draft = InputSnapshot::default();
        self.submitted = None;
        self.phase = SessionPhase::Editing;
        LoadOutcome::Defaulted(reason)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn draft(&self) -> &InputSnapshot {
        &self.draft
    }

    pub fn submitted(&self) -> Option<&Arc<InputSnapshot>> {
        self.submitted.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Inputs the dashboard should load: the last submission, or the defaults.
    pub fn dashboard_snapshot(&self) -> Arc<InputSnapshot> {
        self.submitted
            .clone()
            .unwrap_or_else(|| Arc::new(InputSnapshot::default()))
    }

    fn begin_editing(&mut self) {
        self.phase = SessionPhase::Editing;
    }

    pub fn readiness_mut(&mut self) -> &mut ReadinessInput {
        self.begin_editing();
        &mut self.draft.readiness
    }

    pub fn body_composition_mut(&mut self) -> &mut BodyCompositionInput {
        self.begin_editing();
        &mut self.draft.body_composition
    }

    pub fn strength_mut(&mut self) -> &mut StrengthInput {
        self.begin_editing();
        &mut self.draft.strength
    }

    pub fn nutrition_mut(&mut self) -> &mut NutritionInput {
        self.begin_editing();
        &mut self.draft.nutrition
    }

    pub fn active_tab(&self) -> Domain {
        self.active_tab
    }

    pub fn is_first_tab(&self) -> bool {
        self.active_tab.position() == 0
    }

    /// The last tab doubles as the submit step.
    pub fn is_last_tab(&self) -> bool {
        self.active_tab.position() == Domain::ALL.len() - 1
    }

    pub fn next_tab(&mut self) -> Domain {
        if let Some(next) = Domain::ALL.get(self.active_tab.position() + 1) {
            self.active_tab = *next;
        }
        self.active_tab
    }

    pub fn previous_tab(&mut self) -> Domain {
        if let Some(previous) = self
            .active_tab
            .position()
            .checked_sub(1)
            .and_then(|index| Domain::ALL.get(index))
        {
            self.active_tab = *previous;
        }
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Domain) {
        self.active_tab = tab;
    }

    /// Probes the service with the readiness request, then persists all four groups as one
    /// record. On failure the session stays in `Editing` and nothing is written.
    pub async fn submit(
        &mut self,
        client: &dyn InferenceClient,
    ) -> Result<Arc<InputSnapshot>, SessionError> {
        self.begin_editing();
        match self.try_submit(client).await {
            Ok(snapshot) => {
                self.submitted = Some(snapshot.clone());
                self.phase = SessionPhase::Submitted;
                self.last_error = None;
                info!(key = %self.storage_key, "submitted inputs");
                Ok(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "submit failed");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn try_submit(
        &self,
        client: &dyn InferenceClient,
    ) -> Result<Arc<InputSnapshot>, SessionError> {
        client
            .readiness(&self.draft.readiness)
            .await
            .map_err(SessionError::Probe)?;

        let snapshot = Arc::new(self.draft.clone());
        let record = serde_json::to_string(snapshot.as_ref()).map_err(SessionError::Encode)?;
        self.store
            .set(&self.storage_key, &record)
            .await
            .map_err(SessionError::Persist)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
