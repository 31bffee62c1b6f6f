//! Health check endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, HealthResponse};

/// `GET /api/health`: liveness plus classifier readiness.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let classifier = ctx.core.classifier();
    let active_sessions = ctx.core.read_sessions()?.len();

    Ok(Json(HealthResponse {
        status: if classifier.is_ready() { "ok" } else { "degraded" },
        version: crate::config::APP_VERSION,
        classifier: classifier.model_name().to_string(),
        classifier_ready: classifier.is_ready(),
        active_sessions,
        uptime_secs: ctx.core.uptime_secs(),
    }))
}
