use std::sync::Arc;

use super::*;
use anyhow::Result;
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use storage::Storage;
use tokio::net::TcpListener;

async fn spawn_fuzzy_service(nutrition_status: StatusCode) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route(
            "/api/readiness",
            post(|Json(body): Json<Value>| async move {
                let sleep = body["sleep"].as_f64().unwrap_or_default();
                Json(json!({
                    "intensity": sleep * 10.0,
                    "label": "Moderate",
                    "confidence": 0.75,
                    "input_memberships": {"sleep": {"poor": 0.2, "good": 0.8}},
                    "recommendation": "Moderate session."
                }))
            }),
        )
        .route(
            "/api/body-composition",
            post(|| async {
                Json(json!({
                    "body_fat_low": 15.0,
                    "body_fat_mid": 18.0,
                    "body_fat_high": 21.0,
                    "muscle_mass_category": "Athletic",
                    "bmi": 23.1,
                    "bmi_interpretation": "Healthy weight",
                    "recommendation": "Keep going."
                }))
            }),
        )
        .route(
            "/api/one-rep-max",
            post(|| async {
                Json(json!({
                    "one_rm_low": 115.0,
                    "one_rm_mid": 125.0,
                    "one_rm_high": 135.0,
                    "confidence": 0.8,
                    "recommendation": "Heavy triples."
                }))
            }),
        )
        .route(
            "/api/nutrition",
            post(move || async move {
                (
                    nutrition_status,
                    Json(json!({
                        "calories_low": 2200.0, "calories_mid": 2400.0, "calories_high": 2600.0,
                        "protein_low": 140.0, "protein_mid": 150.0, "protein_high": 160.0,
                        "carbs_low": 220.0, "carbs_mid": 260.0, "carbs_high": 300.0,
                        "fat_low": 60.0, "fat_mid": 70.0, "fat_high": 80.0,
                        "recommendation": "Eat enough protein."
                    })),
                )
            }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn submitted_inputs_survive_restart_and_drive_one_batch() {
    let server_url = spawn_fuzzy_service(StatusCode::OK).await.expect("spawn server");
    let client: Arc<dyn InferenceClient> =
        Arc::new(HttpInferenceClient::new(&server_url).expect("client"));
    let storage = Arc::new(Storage::new("sqlite::memory:").await.expect("storage"));

    let mut session = FormSession::new(storage.clone());
    assert!(matches!(session.load().await, LoadOutcome::Defaulted(_)));
    session.readiness_mut().sleep = 8.5;
    session.submit(client.as_ref()).await.expect("submit");

    let orchestrator = DashboardOrchestrator::new(client);
    let mut restarted = FormSession::new(storage);
    let outcome = orchestrator.start(&mut restarted).await.expect("dashboard loads");

    assert_eq!(restarted.phase(), SessionPhase::Submitted);
    let BatchOutcome::Applied(results) = outcome else {
        panic!("the only batch is applied");
    };
    assert_eq!(results.readiness.intensity, 85.0);
    assert_eq!(results.nutrition.calories.mid(), 2400.0);
    assert_eq!(orchestrator.state().await.batch(), Some(BatchId::new(1)));
}

#[tokio::test]
async fn one_failing_endpoint_surfaces_a_connection_error() {
    let server_url = spawn_fuzzy_service(StatusCode::SERVICE_UNAVAILABLE)
        .await
        .expect("spawn server");
    let client = Arc::new(HttpInferenceClient::new(&server_url).expect("client"));
    let orchestrator = DashboardOrchestrator::new(client);
    let mut session = FormSession::new(Arc::new(MemoryStore::new()));

    let err = orchestrator
        .start(&mut session)
        .await
        .expect_err("nutrition is down");

    assert_eq!(
        err.failures(),
        &[DomainFailure {
            domain: shared::domain::Domain::Nutrition,
            error: InferenceError::Status {
                domain: shared::domain::Domain::Nutrition,
                status: 503,
            },
        }]
    );
    let view = views::dashboard_view(&orchestrator.state().await, &Default::default());
    assert!(matches!(view, views::DashboardView::Error(_)));
}
