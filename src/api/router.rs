//! Dashboard API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. Cache-Control: no-store → 3. Body limit → 4. Audit logger

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;
use crate::pipeline::acquisition::MAX_IMAGE_BYTES;

/// Multipart bodies may carry both an upload and a camera capture.
const MAX_BODY_BYTES: usize = 2 * MAX_IMAGE_BYTES + 64 * 1024;

/// Build the dashboard API router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/strings", get(endpoints::strings::get))
        .route("/sessions", post(endpoints::sessions::create))
        .route("/sessions/:id", delete(endpoints::sessions::end))
        .route("/sessions/:id/diagnose", post(endpoints::diagnose::upload))
        .route("/sessions/:id/capture", post(endpoints::diagnose::capture))
        .route("/sessions/:id/history", get(endpoints::history::get))
        .route("/expert", post(endpoints::expert::request))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        );

    Router::new().nest("/api", api)
}
