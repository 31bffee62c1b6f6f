//! API error types with structured JSON responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::expert::ExpertError;
use crate::models::SettingsError;
use crate::pipeline::{AcquisitionError, ClassifierError, PipelineError};
use crate::session_cache::SessionStoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unsupported image: {0}")]
    InvalidImage(String),
    #[error("Image too large")]
    PayloadTooLarge,
    #[error("Classifier unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {id} not found or already ended"),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::InvalidImage(detail) => {
                (StatusCode::BAD_REQUEST, "INVALID_IMAGE", detail.clone())
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "IMAGE_TOO_LARGE",
                AcquisitionError::TooLarge.to_string(),
            ),
            ApiError::ModelUnavailable(detail) => {
                tracing::warn!(detail, "Diagnosis requested without a classifier");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    "The leaf classifier is not available".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<SessionStoreError> for ApiError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::UnknownSession(id) => ApiError::SessionNotFound(id.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Session(e) => e.into(),
        }
    }
}

impl From<AcquisitionError> for ApiError {
    fn from(err: AcquisitionError) -> Self {
        match err {
            AcquisitionError::TooLarge => ApiError::PayloadTooLarge,
            AcquisitionError::NoImage => ApiError::BadRequest(err.to_string()),
            AcquisitionError::TooLargeDimensions { .. } => ApiError::InvalidImage(err.to_string()),
            other => ApiError::InvalidImage(other.to_string()),
        }
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ModelUnavailable(detail) => ApiError::ModelUnavailable(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Acquisition(e) => e.into(),
            PipelineError::Classifier(e) => e.into(),
            PipelineError::Join(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ExpertError> for ApiError {
    fn from(err: ExpertError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Malformed multipart body: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    async fn json_of(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn session_not_found_returns_404() {
        let id = Uuid::new_v4();
        let response = ApiError::from(SessionStoreError::UnknownSession(id)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "SESSION_NOT_FOUND");
        assert!(json["error"]["message"].as_str().unwrap().contains(&id.to_string()));
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("Invalid field size".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unsupported_format_is_invalid_image() {
        let response = ApiError::from(AcquisitionError::UnsupportedFormat).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"]["code"], "INVALID_IMAGE");
    }

    #[tokio::test]
    async fn oversized_image_returns_413() {
        let response = ApiError::from(AcquisitionError::TooLarge).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn oversized_dimensions_are_invalid_image() {
        let err = AcquisitionError::TooLargeDimensions {
            width: 100_000,
            height: 100_000,
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "INVALID_IMAGE");
        assert!(json["error"]["message"].as_str().unwrap().contains("100000x100000"));
    }

    #[tokio::test]
    async fn model_unavailable_returns_503() {
        let err = PipelineError::Classifier(ClassifierError::ModelUnavailable("gone".into()));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_of(response).await["error"]["code"], "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn inference_failure_returns_500() {
        let err = PipelineError::Classifier(ClassifierError::Inference("shape".into()));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_of(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn core_lock_poisoned_maps_to_internal() {
        let response = ApiError::from(CoreError::LockPoisoned).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_phone_is_bad_request() {
        let response =
            ApiError::from(ExpertError::InvalidPhone("abc".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
