//! Scripted collaborators shared by the orchestration and session tests.

use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use shared::{
    domain::{
        BodyCompositionInput, ConfidenceScore, Domain, FuzzyRange, MuscleMassCategory,
        NutritionInput, ReadinessInput, ReadinessLabel, StrengthInput,
    },
    ordered_map::{InputMemberships, MembershipMap},
};
use tokio::sync::{oneshot, Mutex};

use crate::{
    error::InferenceError,
    inference::InferenceClient,
    results::{
        BodyCompositionResult, DomainResults, NutritionResult, ReadinessResult, StrengthResult,
    },
};

pub(crate) fn fuzzy(low: f64, mid: f64, high: f64) -> FuzzyRange {
    FuzzyRange::new(low, mid, high).expect("valid range")
}

pub(crate) fn confidence(value: f64) -> ConfidenceScore {
    ConfidenceScore::new(value).expect("valid confidence")
}

/// Intensity is `sleep * 10` so tests can tell which inputs produced a result.
pub(crate) fn readiness_result(input: &ReadinessInput) -> ReadinessResult {
    let sleep: MembershipMap = [("poor", 0.1), ("okay", 0.6), ("good", 0.3)]
        .into_iter()
        .collect();
    let stress: MembershipMap = [("low", 0.7), ("medium", 0.7), ("high", 0.0)]
        .into_iter()
        .collect();
    let memberships: InputMemberships = [("sleep", sleep), ("stress", stress)]
        .into_iter()
        .collect();
    ReadinessResult {
        intensity: input.sleep * 10.0,
        label: ReadinessLabel::Hard,
        confidence: confidence(0.82),
        input_memberships: memberships,
        recommendation: "Go for a heavy session.".to_string(),
    }
}

pub(crate) fn body_composition_result() -> BodyCompositionResult {
    BodyCompositionResult {
        body_fat: fuzzy(14.0, 17.5, 21.0),
        muscle_mass_category: MuscleMassCategory::Average,
        bmi: 24.5,
        bmi_interpretation: "Healthy weight".to_string(),
        recommendation: "Maintain current training.".to_string(),
    }
}

pub(crate) fn strength_result() -> StrengthResult {
    StrengthResult {
        one_rm: fuzzy(110.0, 120.0, 130.0),
        confidence: confidence(0.7),
        recommendation: "Work up to a heavy triple.".to_string(),
    }
}

pub(crate) fn nutrition_result() -> NutritionResult {
    NutritionResult {
        calories: fuzzy(2300.0, 2500.0, 2700.0),
        protein: fuzzy(140.0, 150.0, 165.0),
        carbs: fuzzy(250.0, 290.0, 330.0),
        fat: fuzzy(60.0, 70.0, 80.0),
        recommendation: "Hit protein first.".to_string(),
    }
}

pub(crate) fn domain_results() -> DomainResults {
    DomainResults {
        readiness: readiness_result(&ReadinessInput::default()),
        body_composition: body_composition_result(),
        strength: strength_result(),
        nutrition: nutrition_result(),
    }
}

struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Test side of a gated readiness call.
pub(crate) struct GateHandle {
    pub entered: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

/// Fake inference service with canned results, scripted failures and call recording.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    calls: StdMutex<Vec<Domain>>,
    failing: Vec<Domain>,
    readiness_gate: Mutex<Option<Gate>>,
}

impl ScriptedClient {
    pub(crate) fn healthy() -> Self {
        Self::default()
    }

    pub(crate) fn failing(domains: &[Domain]) -> Self {
        Self {
            failing: domains.to_vec(),
            ..Self::default()
        }
    }

    /// The first readiness call signals `entered` and then blocks until `release` fires.
    pub(crate) fn gated() -> (Self, GateHandle) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let client = Self {
            readiness_gate: Mutex::new(Some(Gate {
                entered: entered_tx,
                release: release_rx,
            })),
            ..Self::default()
        };
        (
            client,
            GateHandle {
                entered: entered_rx,
                release: release_tx,
            },
        )
    }

    pub(crate) fn calls(&self) -> Vec<Domain> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn call_count(&self, domain: Domain) -> usize {
        self.calls().into_iter().filter(|call| *call == domain).count()
    }

    fn record(&self, domain: Domain) -> Result<(), InferenceError> {
        self.calls.lock().expect("calls lock").push(domain);
        if self.failing.contains(&domain) {
            return Err(InferenceError::Unreachable {
                domain,
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn readiness(&self, input: &ReadinessInput) -> Result<ReadinessResult, InferenceError> {
        let gate = self.readiness_gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }
        self.record(Domain::Readiness)?;
        Ok(readiness_result(input))
    }

    async fn body_composition(
        &self,
        _input: &BodyCompositionInput,
    ) -> Result<BodyCompositionResult, InferenceError> {
        self.record(Domain::BodyComposition)?;
        Ok(body_composition_result())
    }

    async fn one_rep_max(&self, _input: &StrengthInput) -> Result<StrengthResult, InferenceError> {
        self.record(Domain::Strength)?;
        Ok(strength_result())
    }

    async fn nutrition(&self, _input: &NutritionInput) -> Result<NutritionResult, InferenceError> {
        self.record(Domain::Nutrition)?;
        Ok(nutrition_result())
    }
}
