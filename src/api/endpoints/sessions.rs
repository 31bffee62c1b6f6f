//! Session lifecycle: start and end.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::endpoints::parse_session_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionCreated, SessionEnded};

/// `POST /api/sessions`: start a session with an empty history.
pub async fn create(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let info = ctx.core.start_session()?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: info.session_id,
            started_at: info.started_at,
        }),
    ))
}

/// `DELETE /api/sessions/:id`: end a session and drop its history.
pub async fn end(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SessionEnded>, ApiError> {
    let session_id = parse_session_id(&id)?;
    ctx.core.end_session(&session_id)?;
    Ok(Json(SessionEnded {
        session_id: session_id.to_string(),
        ended: true,
    }))
}
