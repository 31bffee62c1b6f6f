//! Leaf diagnosis endpoints.
//!
//! `POST /api/sessions/:id/diagnose` takes a multipart form with `upload`
//! and/or `camera` image parts plus `field_size` and `language` text parts.
//! `POST /api/sessions/:id/capture` takes a base64 data-URL camera capture.
//!
//! Classification runs on a blocking worker; the result is then recorded
//! into the session's history.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use uuid::Uuid;

use crate::api::endpoints::parse_session_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CaptureRequest};
use crate::models::UserSettings;
use crate::pipeline::acquisition::{choose_source, MAX_IMAGE_BYTES};
use crate::pipeline::processor::SessionDiagnosis;
use crate::pipeline::{AcquisitionError, PipelineError, RawImage};

/// `POST /api/sessions/:id/diagnose` (multipart)
pub async fn upload(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<SessionDiagnosis>, ApiError> {
    let session_id = parse_session_id(&id)?;
    ctx.core.require_session(&session_id)?;

    let mut upload: Option<Vec<u8>> = None;
    let mut camera: Option<Vec<u8>> = None;
    let mut field_size: Option<String> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "upload" | "camera" => {
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(AcquisitionError::TooLarge.into());
                }
                if name == "upload" {
                    upload = Some(bytes.to_vec());
                } else {
                    camera = Some(bytes.to_vec());
                }
            }
            "field_size" => field_size = Some(field.text().await?),
            "language" => language = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let settings = UserSettings::from_raw(field_size.as_deref(), language.as_deref())?;
    let raw = choose_source(upload, camera).ok_or(AcquisitionError::NoImage)?;

    run(&ctx, session_id, raw, settings).await
}

/// `POST /api/sessions/:id/capture` (JSON data URL)
pub async fn capture(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<CaptureRequest>,
) -> Result<Json<SessionDiagnosis>, ApiError> {
    let session_id = parse_session_id(&id)?;
    ctx.core.require_session(&session_id)?;

    let field_size = payload.field_size.map(|f| f.to_string());
    let settings = UserSettings::from_raw(field_size.as_deref(), payload.language.as_deref())?;
    let raw = RawImage::from_data_url(&payload.data_url)?;

    run(&ctx, session_id, raw, settings).await
}

async fn run(
    ctx: &ApiContext,
    session_id: Uuid,
    raw: RawImage,
    settings: UserSettings,
) -> Result<Json<SessionDiagnosis>, ApiError> {
    let processor = ctx.core.processor().clone();
    let diagnosis = tokio::task::spawn_blocking(move || processor.diagnose(raw, &settings))
        .await
        .map_err(|e| PipelineError::Join(e.to_string()))??;

    let result = ctx.core.record_diagnosis(&session_id, diagnosis)?;
    tracing::info!(
        session = %session_id,
        label = %result.diagnosis.classification.label,
        scans = result.history.total_scans,
        "Diagnosis recorded"
    );
    Ok(Json(result))
}
