//! Shared application state.
//!
//! `CoreState` holds the classifier (initialized once at startup), the
//! knowledge file location and the live scan sessions. Wrapped in `Arc`
//! and handed to the axum router.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use uuid::Uuid;

use crate::config::ServerConfig;
use crate::pipeline::classifier::{load_classifier, SharedClassifier};
use crate::history::DEFAULT_TREND_LEN;
use crate::pipeline::processor::{Diagnosis, DiagnosisProcessor, SessionDiagnosis};
use crate::session_cache::{SessionInfo, SessionStore, SessionStoreError};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    processor: DiagnosisProcessor,
    /// Live sessions. Read-mostly: history views take the read lock,
    /// only create/end/record take the write lock.
    sessions: RwLock<SessionStore>,
    started_at: Instant,
}

impl CoreState {
    pub fn new(classifier: SharedClassifier, knowledge_path: impl Into<PathBuf>) -> Self {
        Self {
            processor: DiagnosisProcessor::new(classifier, knowledge_path),
            sessions: RwLock::new(SessionStore::new()),
            started_at: Instant::now(),
        }
    }

    /// Load the classifier and wire up state from server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        let classifier = load_classifier(&config.model_dir);
        tracing::info!(
            model = classifier.model_name(),
            ready = classifier.is_ready(),
            knowledge = %config.knowledge_path.display(),
            "Classifier initialized"
        );
        Self::new(classifier, config.knowledge_path.clone())
    }

    pub fn processor(&self) -> &DiagnosisProcessor {
        &self.processor
    }

    pub fn classifier(&self) -> &SharedClassifier {
        self.processor.classifier()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    // ── Session access ──────────────────────────────────────

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionStore>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionStore>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn start_session(&self) -> Result<SessionInfo, CoreError> {
        let mut store = self.write_sessions()?;
        let id = store.create();
        let info = store
            .get(&id)
            .map(|s| s.info())
            .ok_or(SessionStoreError::UnknownSession(id))?;
        tracing::info!(session = %id, active = store.len(), "Session started");
        Ok(info)
    }

    pub fn end_session(&self, session_id: &Uuid) -> Result<(), CoreError> {
        let mut store = self.write_sessions()?;
        store.end(session_id)?;
        tracing::info!(session = %session_id, active = store.len(), "Session ended");
        Ok(())
    }

    pub fn require_session(&self, session_id: &Uuid) -> Result<(), CoreError> {
        if self.read_sessions()?.contains(session_id) {
            Ok(())
        } else {
            Err(SessionStoreError::UnknownSession(*session_id).into())
        }
    }

    /// Record a finished diagnosis into its session. A scan whose timestamp
    /// equals the last stored one is returned with `recorded: false`.
    pub fn record_diagnosis(
        &self,
        session_id: &Uuid,
        diagnosis: Diagnosis,
    ) -> Result<SessionDiagnosis, CoreError> {
        let mut store = self.write_sessions()?;
        let recorded = store.record(session_id, diagnosis.history_entry())?;
        if !recorded {
            tracing::debug!(session = %session_id, "Duplicate scan timestamp, not recorded");
        }
        Ok(SessionDiagnosis {
            session_id: *session_id,
            recorded,
            history: store.summary(session_id, DEFAULT_TREND_LEN)?,
            diagnosis,
        })
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}
