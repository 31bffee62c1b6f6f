//! Scan history for the trend display.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::endpoints::parse_session_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, HistoryQuery, HistoryResponse};
use crate::history::DEFAULT_TREND_LEN;

/// Upper bound on `limit` so a single response stays small.
const MAX_HISTORY_LIMIT: usize = 500;

/// `GET /api/sessions/:id/history?limit=10`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TREND_LEN)
        .min(MAX_HISTORY_LIMIT);

    let summary = ctx.core.read_sessions()?.summary(&session_id, limit)?;
    Ok(Json(HistoryResponse {
        session_id: session_id.to_string(),
        summary,
    }))
}
