//! Per-user session store.
//!
//! Each interactive session owns a private `SessionHistory`. Sessions live
//! in memory only: ending a session (or restarting the process) drops its
//! history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::history::{HistorySummary, SessionHistory};
use crate::models::HistoryEntry;

// ═══════════════════════════════════════════════════════════
// ScanSession — one user's context
// ═══════════════════════════════════════════════════════════

/// Explicit per-session context passed into the pipeline.
pub struct ScanSession {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    history: SessionHistory,
}

impl ScanSession {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            started_at: Utc::now(),
            history: SessionHistory::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id.to_string(),
            started_at: self.started_at.to_rfc3339(),
            scans: self.history.len(),
        }
    }
}

/// Serializable session metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub started_at: String,
    pub scans: usize,
}

// ═══════════════════════════════════════════════════════════
// SessionStore — all live sessions
// ═══════════════════════════════════════════════════════════

pub struct SessionStore {
    sessions: HashMap<Uuid, ScanSession>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Start a new session with an empty history.
    pub fn create(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, ScanSession::new(id));
        id
    }

    pub fn get(&self, session_id: &Uuid) -> Option<&ScanSession> {
        self.sessions.get(session_id)
    }

    pub fn contains(&self, session_id: &Uuid) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// End a session; its history is dropped.
    pub fn end(&mut self, session_id: &Uuid) -> Result<(), SessionStoreError> {
        self.sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or(SessionStoreError::UnknownSession(*session_id))
    }

    /// Append a scan to a session's history. Returns whether it was stored.
    pub fn record(
        &mut self,
        session_id: &Uuid,
        entry: HistoryEntry,
    ) -> Result<bool, SessionStoreError> {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionStoreError::UnknownSession(*session_id))?;
        Ok(session.history.record_scan(entry))
    }

    pub fn summary(
        &self,
        session_id: &Uuid,
        tail: usize,
    ) -> Result<HistorySummary, SessionStoreError> {
        self.sessions
            .get(session_id)
            .map(|s| s.history().summary(tail))
            .ok_or(SessionStoreError::UnknownSession(*session_id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session {0} not found")]
    UnknownSession(Uuid),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
