//! Expert consultation request.

use axum::Json;

use crate::api::error::ApiError;
use crate::expert::{acknowledge, ExpertAcknowledgement, ExpertRequest};

/// `POST /api/expert`: validate and acknowledge. Nothing is sent.
pub async fn request(
    Json(payload): Json<ExpertRequest>,
) -> Result<Json<ExpertAcknowledgement>, ApiError> {
    Ok(Json(acknowledge(&payload)?))
}
