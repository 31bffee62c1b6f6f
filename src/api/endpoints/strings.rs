//! Localized UI strings.

use axum::extract::Query;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{LanguageQuery, StringsResponse};
use crate::i18n;
use crate::models::Language;

/// `GET /api/strings?language=hindi`
pub async fn get(Query(query): Query<LanguageQuery>) -> Result<Json<StringsResponse>, ApiError> {
    let language = match query.language.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse::<Language>()?,
        _ => Language::default(),
    };
    Ok(Json(StringsResponse {
        language,
        strings: i18n::strings(language),
    }))
}
