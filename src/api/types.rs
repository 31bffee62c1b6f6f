//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::history::HistorySummary;
use crate::models::Language;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub classifier: String,
    pub classifier_ready: bool,
    pub active_sessions: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StringsResponse {
    pub language: Language,
    pub strings: &'static crate::i18n::UiStrings,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub started_at: String,
}

#[derive(Debug, Serialize)]
pub struct SessionEnded {
    pub session_id: String,
    pub ended: bool,
}

/// Camera capture sent as a base64 data URL.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub data_url: String,
    pub field_size: Option<f64>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub summary: HistorySummary,
}
