//! REST API handlers.
//!
//! Driver calls answer with the driver's own status taxonomy (200, 400,
//! 500). Execute runs the blocking scaler on tokio's blocking pool and
//! gives up waiting after `ApiState::request_timeout`; the scale request
//! itself is not cancelled and may still finish.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use tracing::{info, warn};

use hostscale_autoscale::DriverOutcome;
use hostscale_state::NewHost;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn outcome_response(outcome: DriverOutcome) -> impl IntoResponse {
    let status =
        StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse {
            success: outcome.is_ok(),
            data: outcome.data,
            error: outcome.error,
        }),
    )
}

// ── Drivers ────────────────────────────────────────────────────

/// GET /api/v1/drivers
pub async fn list_drivers(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.registry.schemas())
}

/// POST /api/v1/drivers/{driver}/validate
pub async fn validate_config(
    State(state): State<ApiState>,
    Path(driver): Path<String>,
    Json(config): Json<Value>,
) -> impl IntoResponse {
    outcome_response(state.registry.validate(&driver, &config))
}

/// POST /api/v1/drivers/{driver}/execute
pub async fn execute_config(
    State(state): State<ApiState>,
    Path(driver): Path<String>,
    Json(config): Json<Value>,
) -> impl IntoResponse {
    let registry = state.registry.clone();
    let task = tokio::task::spawn_blocking(move || {
        info!(%driver, "executing scale request");
        registry.execute(&driver, &config)
    });

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(outcome)) => outcome_response(outcome).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "scale task panicked");
            error_response("scale task failed", StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
        Err(_) => {
            warn!(
                timeout_secs = state.request_timeout.as_secs(),
                "scale request timed out"
            );
            error_response(
                "scale request timed out; hosts may still be changing",
                StatusCode::GATEWAY_TIMEOUT,
            )
            .into_response()
        }
    }
}

// ── Hosts ──────────────────────────────────────────────────────

/// Query string for host listings.
#[derive(serde::Deserialize)]
pub struct HostQuery {
    #[serde(rename = "hostTemplateId")]
    pub host_template_id: Option<String>,
}

/// GET /api/v1/hosts
pub async fn list_hosts(
    State(state): State<ApiState>,
    Query(query): Query<HostQuery>,
) -> impl IntoResponse {
    let result = match query.host_template_id.as_deref() {
        Some(id) => state.store.list_hosts_for_template(id),
        None => state.store.list_hosts(),
    };
    match result {
        Ok(hosts) => ApiResponse::ok(hosts).into_response(),
        Err(e) => error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// POST /api/v1/hosts
pub async fn create_host(
    State(state): State<ApiState>,
    Json(draft): Json<NewHost>,
) -> impl IntoResponse {
    if draft.host_template_id.is_empty() {
        return error_response("hostTemplateId is required", StatusCode::BAD_REQUEST)
            .into_response();
    }
    match state.store.create_host(draft) {
        Ok(host) => (StatusCode::CREATED, ApiResponse::ok(host)).into_response(),
        Err(e) => error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// DELETE /api/v1/hosts/{id}
pub async fn delete_host(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_host(&id) {
        Ok(true) => ApiResponse::ok("deleted").into_response(),
        Ok(false) => error_response("host not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    "ok"
}
