use super::*;
use crate::{
    error::InferenceError,
    store::MemoryStore,
    test_support::ScriptedClient,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use shared::domain::Goal;

/// Store whose reads and writes always fail.
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("disk unavailable"))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk unavailable"))
    }
}

fn session_with(store: Arc<MemoryStore>) -> FormSession {
    FormSession::new(store)
}

#[tokio::test]
async fn empty_store_starts_editing_from_defaults() {
    let mut session = session_with(Arc::new(MemoryStore::new()));
    assert_eq!(session.phase(), SessionPhase::Empty);

    let outcome = session.load().await;

    assert_eq!(outcome, LoadOutcome::Defaulted(DefaultReason::NothingStored));
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(session.draft(), &InputSnapshot::default());
    assert_eq!(session.draft().readiness.sleep, 7.0);
    assert_eq!(session.draft().strength.reps, "6");
    assert!(session.submitted().is_none());
}

#[tokio::test]
async fn malformed_record_is_discarded_silently() {
    let store = Arc::new(MemoryStore::with_entry(INPUTS_STORAGE_KEY, "{\"readiness\": 7"));
    let mut session = session_with(store);

    let outcome = session.load().await;

    assert_eq!(outcome, LoadOutcome::Defaulted(DefaultReason::Malformed));
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(session.last_error(), None);
    assert_eq!(session.dashboard_snapshot().as_ref(), &InputSnapshot::default());
}

#[tokio::test]
async fn unreadable_store_falls_back_to_defaults() {
    let mut session = FormSession::new(Arc::new(BrokenStore));
    let outcome = session.load().await;
    assert_eq!(outcome, LoadOutcome::Defaulted(DefaultReason::StoreUnavailable));
    assert_eq!(session.phase(), SessionPhase::Editing);
}

#[tokio::test]
async fn submit_persists_one_record_and_reload_restores_it() {
    let store = Arc::new(MemoryStore::new());
    let client = ScriptedClient::healthy();
    let mut session = session_with(store.clone());
    session.load().await;

    {
        let readiness = session.readiness_mut();
        readiness.sleep = 7.0;
        readiness.energy = 6.0;
        readiness.soreness = 4.0;
        readiness.stress = 3.0;
    }
    session.nutrition_mut().goal = Goal::Cut;
    let submitted = session.submit(&client).await.expect("submit");

    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert_eq!(client.calls(), vec![Domain::Readiness]);

    let raw = store
        .get(INPUTS_STORAGE_KEY)
        .await
        .expect("read")
        .expect("record written");
    let record: Value = serde_json::from_str(&raw).expect("json record");
    let keys: Vec<&str> = record
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 4);
    for key in ["readiness", "bodyComp", "strength", "nutrition"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(record["nutrition"]["goal"], "cut");

    let mut reloaded = session_with(store);
    let outcome = reloaded.load().await;
    assert_eq!(outcome.restored(), Some(&submitted));
    assert_eq!(reloaded.phase(), SessionPhase::Submitted);
    assert_eq!(reloaded.dashboard_snapshot(), submitted);
}

#[tokio::test]
async fn failed_probe_keeps_editing_and_persists_nothing() {
    let store = Arc::new(MemoryStore::new());
    let client = ScriptedClient::failing(&[Domain::Readiness]);
    let mut session = session_with(store.clone());
    session.load().await;
    session.readiness_mut().sleep = 9.0;

    let err = session.submit(&client).await.expect_err("probe fails");

    assert!(matches!(
        err,
        SessionError::Probe(InferenceError::Unreachable {
            domain: Domain::Readiness,
            ..
        })
    ));
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert!(session
        .last_error()
        .is_some_and(|message| message.contains("failed to connect")));
    assert_eq!(store.get(INPUTS_STORAGE_KEY).await.expect("read"), None);
    assert_eq!(session.draft().readiness.sleep, 9.0);
}

#[tokio::test]
async fn failed_write_is_reported_as_persist_error() {
    let client = ScriptedClient::healthy();
    let mut session = FormSession::new(Arc::new(BrokenStore));
    session.load().await;

    let err = session.submit(&client).await.expect_err("write fails");

    assert!(matches!(err, SessionError::Persist(_)));
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert!(session.submitted().is_none());
}

#[tokio::test]
async fn successful_submit_clears_previous_error() {
    let store = Arc::new(MemoryStore::new());
    let mut session = session_with(store);
    session.load().await;

    let _ = session
        .submit(&ScriptedClient::failing(&[Domain::Readiness]))
        .await;
    assert!(session.last_error().is_some());

    session
        .submit(&ScriptedClient::healthy())
        .await
        .expect("second submit");
    assert_eq!(session.last_error(), None);
}

#[tokio::test]
async fn editing_after_submit_copies_the_snapshot() {
    let mut session = session_with(Arc::new(MemoryStore::new()));
    session.load().await;
    let submitted = session
        .submit(&ScriptedClient::healthy())
        .await
        .expect("submit");

    session.strength_mut().weight_lifted = 140.0;

    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(submitted.strength.weight_lifted, 100.0);
    assert_eq!(session.dashboard_snapshot().strength.weight_lifted, 100.0);
    assert_eq!(session.draft().strength.weight_lifted, 140.0);
}

#[tokio::test]
async fn wizard_navigation_stops_at_the_ends_without_touching_storage() {
    let store = Arc::new(MemoryStore::new());
    let mut session = session_with(store.clone());
    session.load().await;

    assert!(session.is_first_tab());
    assert_eq!(session.previous_tab(), Domain::Readiness);
    assert_eq!(session.next_tab(), Domain::BodyComposition);
    assert_eq!(session.next_tab(), Domain::Strength);
    assert_eq!(session.next_tab(), Domain::Nutrition);
    assert!(session.is_last_tab());
    assert_eq!(session.next_tab(), Domain::Nutrition);
    assert_eq!(session.previous_tab(), Domain::Strength);

    session.select_tab(Domain::Readiness);
    assert!(session.is_first_tab());
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(store.get(INPUTS_STORAGE_KEY).await.expect("read"), None);
}
