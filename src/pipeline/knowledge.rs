use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::models::{AdvisoryRecord, AdvisorySource};

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge base {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse knowledge base {0}: {1}")]
    Parse(String, String),
}

/// Label → advisory mapping loaded from a static JSON file.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<String, AdvisoryRecord>,
}

impl KnowledgeBase {
    /// Load the knowledge base from a JSON object keyed by label.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| KnowledgeError::Load(path.display().to_string(), e.to_string()))?;
        Self::from_json(&json)
            .map_err(|e| KnowledgeError::Parse(path.display().to_string(), e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, AdvisoryRecord> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up by raw label, then by its cleaned display form.
    /// Returns the key that matched alongside the record.
    pub fn get(&self, label: &str) -> Option<(&str, &AdvisoryRecord)> {
        if let Some((key, record)) = self.entries.get_key_value(label) {
            return Some((key.as_str(), record));
        }

        let cleaned = clean_label(label);
        if let Some((key, record)) = self.entries.get_key_value(&cleaned) {
            return Some((key.as_str(), record));
        }

        let lower = cleaned.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| clean_label(key).to_lowercase() == lower)
            .map(|(key, record)| (key.as_str(), record))
    }
}

/// Display form of a classifier label: underscores become spaces and
/// runs of whitespace collapse, e.g. `Tomato___Early_blight` → `Tomato Early blight`.
pub fn clean_label(label: &str) -> String {
    label
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outcome of an advisory lookup. Never fails: defaults stand in.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryLookup {
    pub record: AdvisoryRecord,
    pub source: AdvisorySource,
    pub matched_key: Option<String>,
    /// Set when the knowledge base could not be loaded.
    pub warning: Option<String>,
}

/// Read the knowledge file and resolve `label`.
///
/// Missing label → `AdvisoryRecord::unmapped()`.
/// Unreadable or malformed file → `AdvisoryRecord::unavailable()` plus a warning.
pub fn lookup_advisory(path: &Path, label: &str) -> AdvisoryLookup {
    match KnowledgeBase::load(path) {
        Ok(kb) => resolve(&kb, label),
        Err(e) => {
            tracing::warn!(error = %e, "Knowledge base unavailable, using default advisory");
            AdvisoryLookup {
                record: AdvisoryRecord::unavailable(),
                source: AdvisorySource::LoadFailed,
                matched_key: None,
                warning: Some("Knowledge base could not be loaded; showing default advice".into()),
            }
        }
    }
}

/// Resolve `label` against an already-loaded knowledge base.
pub fn resolve(kb: &KnowledgeBase, label: &str) -> AdvisoryLookup {
    match kb.get(label) {
        Some((key, record)) => AdvisoryLookup {
            record: record.clone(),
            source: AdvisorySource::Stored,
            matched_key: Some(key.to_string()),
            warning: None,
        },
        None => {
            tracing::debug!(label, "No advisory entry for label");
            AdvisoryLookup {
                record: AdvisoryRecord::unmapped(),
                source: AdvisorySource::Default,
                matched_key: None,
                warning: None,
            }
        }
    }
}
