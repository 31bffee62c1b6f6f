//! REST endpoint handlers, one module per resource.

pub mod diagnose;
pub mod expert;
pub mod health;
pub mod history;
pub mod sessions;
pub mod strings;

use uuid::Uuid;

use crate::api::error::ApiError;

/// Parse a `:id` path segment as a session UUID.
pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid session id: {raw}")))
}
