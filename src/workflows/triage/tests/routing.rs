use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::triage::router::medication_handler;
use crate::workflows::triage::service::TriageService;
use crate::workflows::triage::{medication, nutrition};

#[tokio::test]
async fn medication_route_returns_the_assessment() {
    let (service, publisher) = build_service();
    let router = triage_router_with_service(service);

    let request = medication_request(scenario_b_input());
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/triage/medication")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&request).expect("request serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("level").and_then(serde_json::Value::as_str),
        Some("high")
    );
    assert_eq!(
        payload
            .get("requires_immediate_attention")
            .and_then(serde_json::Value::as_bool),
        Some(true)
    );
    assert!(payload.get("score").and_then(serde_json::Value::as_f64).is_some());
    assert_eq!(publisher.events().len(), 1);
}

#[tokio::test]
async fn nutrition_route_returns_the_assessment() {
    let (service, _publisher) = build_service();
    let router = triage_router_with_service(service);

    let request = nutrition_request(high_urgency_nutrition_input());
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/triage/nutrition")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&request).expect("request serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("level").and_then(serde_json::Value::as_str),
        Some("high")
    );
}

#[tokio::test]
async fn malformed_payload_is_rejected_as_client_error() {
    let (service, _publisher) = build_service();
    let router = triage_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/triage/medication")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{\"subject\":{}}"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn notification_failure_maps_to_bad_gateway() {
    let service = Arc::new(
        TriageService::with_configs(
            Arc::new(FailingPublisher),
            medication::standard_config(),
            nutrition::standard_config(),
        )
        .expect("standard configs pass validation"),
    );

    let response = medication_handler::<FailingPublisher>(
        State(service),
        axum::Json(medication_request(scenario_b_input())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .contains("transport"));
}
