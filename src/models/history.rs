use serde::{Deserialize, Serialize};

/// One scan in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub label: String,
    pub score: f32,
}

impl HistoryEntry {
    pub fn new(timestamp: impl Into<String>, label: impl Into<String>, score: f32) -> Self {
        Self {
            timestamp: timestamp.into(),
            label: label.into(),
            score,
        }
    }
}
