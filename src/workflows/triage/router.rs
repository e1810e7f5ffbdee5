use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::notification::NotificationPublisher;
use super::service::{
    MedicationTriageRequest, NutritionTriageRequest, TriageService, TriageServiceError,
};

/// Router builder exposing the triage endpoints for both domains.
pub fn triage_router<P>(service: Arc<TriageService<P>>) -> Router
where
    P: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/triage/medication", post(medication_handler::<P>))
        .route("/api/v1/triage/nutrition", post(nutrition_handler::<P>))
        .with_state(service)
}

pub(crate) async fn medication_handler<P>(
    State(service): State<Arc<TriageService<P>>>,
    axum::Json(request): axum::Json<MedicationTriageRequest>,
) -> Response
where
    P: NotificationPublisher + 'static,
{
    match service.assess_medication(request) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(TriageServiceError::Notification(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn nutrition_handler<P>(
    State(service): State<Arc<TriageService<P>>>,
    axum::Json(request): axum::Json<NutritionTriageRequest>,
) -> Response
where
    P: NotificationPublisher + 'static,
{
    match service.assess_nutrition(request) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(TriageServiceError::Notification(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
