//! Leaf diagnosis orchestrator.
//!
//! Single entry point that drives the full pipeline:
//! acquire → classify → advisory lookup → metrics. Recording into a
//! session happens in `CoreState::record_diagnosis`.
//!
//! The classifier sits behind `ImageClassifier`, so the orchestrator is
//! fully testable with `MockClassifier`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::history::HistorySummary;
use crate::models::{
    AdvisoryRecord, AdvisorySource, ClassificationResult, HistoryEntry, ImageSource, Language,
    UserSettings,
};
use crate::pipeline::acquisition::{acquire, AcquisitionError, RawImage};
use crate::pipeline::classifier::{classify_top, ClassifierError, SharedClassifier};
use crate::pipeline::knowledge::{clean_label, lookup_advisory};
use crate::pipeline::metrics::{resource_comparison, ComparisonRow, ImpactSummary, SavingsReport};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Image acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Diagnosis task failed: {0}")]
    Join(String),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything the dashboard shows for one submitted leaf image.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub source: ImageSource,
    pub classification: ClassificationResult,
    /// Label with underscores removed, for display.
    pub display_label: String,
    pub confidence_pct: f32,
    pub advisory: AdvisoryRecord,
    pub advisory_source: AdvisorySource,
    /// Treatment text in the requested language.
    pub treatment: String,
    pub language: Language,
    pub field_size_acres: f64,
    pub savings: SavingsReport,
    pub impact: ImpactSummary,
    pub comparison: Vec<ComparisonRow>,
    pub warnings: Vec<String>,
    pub timestamp: String,
}

impl Diagnosis {
    /// History record for this diagnosis.
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry::new(
            self.timestamp.clone(),
            self.classification.label.clone(),
            self.classification.confidence,
        )
    }
}

/// A diagnosis plus the state of the session it was recorded into.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDiagnosis {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub diagnosis: Diagnosis,
    /// `false` when a scan with the same timestamp was already stored.
    pub recorded: bool,
    pub history: HistorySummary,
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Runs the diagnosis pipeline against a shared classifier and a
/// knowledge file that is re-read on every lookup.
#[derive(Clone)]
pub struct DiagnosisProcessor {
    classifier: SharedClassifier,
    knowledge_path: PathBuf,
}

impl DiagnosisProcessor {
    pub fn new(classifier: SharedClassifier, knowledge_path: impl Into<PathBuf>) -> Self {
        Self {
            classifier,
            knowledge_path: knowledge_path.into(),
        }
    }

    pub fn knowledge_path(&self) -> &Path {
        &self.knowledge_path
    }

    pub fn classifier(&self) -> &SharedClassifier {
        &self.classifier
    }

    /// Run the pipeline for one image. Blocking: call from a worker thread
    /// in async contexts.
    pub fn diagnose(
        &self,
        raw: RawImage,
        settings: &UserSettings,
    ) -> Result<Diagnosis, PipelineError> {
        let start = std::time::Instant::now();

        let acquired = acquire(raw)?;
        tracing::debug!(
            source = acquired.source.as_str(),
            width = acquired.width(),
            height = acquired.height(),
            "Leaf image acquired"
        );

        let classification = classify_top(self.classifier.as_ref(), &acquired.image)?;

        let lookup = lookup_advisory(&self.knowledge_path, &classification.label);
        let warnings: Vec<String> = lookup.warning.into_iter().collect();

        let confidence = classification.confidence;
        let field = settings.field_size_acres;
        let treatment = lookup.record.treatment_for(settings.language).to_string();

        tracing::info!(
            label = %classification.label,
            confidence,
            advisory = lookup.source.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Leaf diagnosed"
        );

        Ok(Diagnosis {
            source: acquired.source,
            display_label: clean_label(&classification.label),
            confidence_pct: classification.confidence_pct(),
            advisory: lookup.record,
            advisory_source: lookup.source,
            treatment,
            language: settings.language,
            field_size_acres: field,
            savings: SavingsReport::derive(confidence, field),
            impact: ImpactSummary::for_field(field),
            comparison: resource_comparison(confidence),
            warnings,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            classification,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
