//! HTTP surface - the transport collaborator.
//!
//! Thin by design: validation, decode, and queueing all live in the core
//! service; this layer only maps the wire contract.
//!
//! - `GET /operations`    → allow-list, configured order
//! - `GET /resource-info` → configured model identifier
//! - `POST /process`      → `{payload, operation}` → `{result}`
//!
//! Error bodies are `{"detail": <message>}`; the error kind picks the
//! status code, never the message text.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use glance_core::{GlanceError, VisionService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VisionService>,
}

pub fn router(service: Arc<VisionService>) -> Router {
    Router::new()
        .route("/operations", get(list_operations))
        .route("/resource-info", get(resource_info))
        .route("/process", post(process))
        .with_state(AppState { service })
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub payload: String,
    pub operation: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub result: String,
}

async fn list_operations(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.service.operations().names())
}

async fn resource_info(State(state): State<AppState>) -> Json<String> {
    Json(state.service.model_id().to_string())
}

async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let result = state
        .service
        .process(&request.operation, &request.payload)
        .await?;
    Ok(Json(ProcessResponse { result }))
}

/// Wire-level error wrapper.
#[derive(Debug)]
pub struct ApiError(GlanceError);

impl From<GlanceError> for ApiError {
    fn from(err: GlanceError) -> Self {
        Self(err)
    }
}

/// Status code and body message for one service error.
pub fn status_and_detail(err: &GlanceError) -> (StatusCode, String) {
    match err {
        GlanceError::InvalidOperation | GlanceError::InvalidPayload(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        GlanceError::QueueFull => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        GlanceError::Initialization(detail)
        | GlanceError::Operation(detail)
        | GlanceError::Internal(detail) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("error processing payload: {detail}"),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = status_and_detail(&self.0);
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_core::ServiceConfig;
    use glance_core::impls::StubEngine;
    use glance_core::ports::VisionEngine;
    use glance_core::service::ServiceTasks;

    fn start() -> (AppState, ServiceTasks) {
        let engine = Arc::new(StubEngine::new("stub-model")) as Arc<dyn VisionEngine>;
        let (service, tasks) = VisionService::spawn(ServiceConfig::default(), engine);
        (AppState { service }, tasks)
    }

    #[tokio::test]
    async fn operations_returns_configured_list() {
        let (state, tasks) = start();
        let Json(ops) = list_operations(State(state)).await;
        assert_eq!(ops.first().map(String::as_str), Some("<GENERATE_TAGS>"));
        assert_eq!(ops.len(), 7);
        tasks.shutdown_and_join().await;
    }

    #[tokio::test]
    async fn resource_info_names_the_model() {
        let (state, tasks) = start();
        let Json(model) = resource_info(State(state)).await;
        assert_eq!(model, "stub-model");
        tasks.shutdown_and_join().await;
    }

    #[tokio::test]
    async fn process_round_trips_a_valid_request() {
        let (state, tasks) = start();
        let request = ProcessRequest {
            payload: "aGVsbG8=".to_string(), // "hello"
            operation: "<CAPTION>".to_string(),
        };
        let Json(response) = process(State(state), Json(request)).await.unwrap();
        assert_eq!(response.result, "<CAPTION> (5 bytes)");
        tasks.shutdown_and_join().await;
    }

    #[test]
    fn client_faults_map_to_400_with_exact_messages() {
        let (status, detail) = status_and_detail(&GlanceError::InvalidOperation);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail, "invalid operation");

        let (status, detail) =
            status_and_detail(&GlanceError::InvalidPayload("bad base64".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail, "invalid payload: bad base64");
    }

    #[test]
    fn server_faults_map_to_500_with_processing_prefix() {
        let (status, detail) = status_and_detail(&GlanceError::Operation("oom".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail, "error processing payload: oom");

        let (status, _) = status_and_detail(&GlanceError::Initialization("no weights".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn queue_full_maps_to_503() {
        let (status, _) = status_and_detail(&GlanceError::QueueFull);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
