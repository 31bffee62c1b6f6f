use serde::{Deserialize, Serialize};

/// One (label, confidence) pair as reported by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// The winning prediction for a submitted image. Confidence is in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f32,
}

impl ClassificationResult {
    /// Confidence as a display percentage, e.g. `82.0`.
    pub fn confidence_pct(&self) -> f32 {
        self.confidence * 100.0
    }
}
