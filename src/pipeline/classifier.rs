//! Classifier adapter: opaque image classifier behind a trait.
//!
//! The model is initialized once at startup and shared read-only as a
//! `SharedClassifier`. Failures propagate unchanged; there is no retry.

use std::sync::Arc;

use image::RgbImage;
use thiserror::Error;

use crate::models::{ClassificationResult, Prediction};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier model not available: {0}")]
    ModelUnavailable(String),

    #[error("Classifier model failed to initialize: {0}")]
    ModelInit(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Classifier returned no predictions")]
    EmptyPredictions,
}

/// Image in, ranked (label, confidence) list out.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, image: &RgbImage) -> Result<Vec<Prediction>, ClassifierError>;

    /// Model identifier for health and logs.
    fn model_name(&self) -> &str;

    /// `false` when every call is known to fail.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Process-wide classifier handle.
pub type SharedClassifier = Arc<dyn ImageClassifier>;

/// Pick the highest-confidence prediction. First entry wins on ties.
/// Confidence is clamped into [0, 1]; NaN scores are treated as 0.
pub fn select_top(predictions: &[Prediction]) -> Result<ClassificationResult, ClassifierError> {
    let mut best: Option<&Prediction> = None;
    for p in predictions {
        match best {
            Some(b) if sanitize(p.confidence) <= sanitize(b.confidence) => {}
            _ => best = Some(p),
        }
    }

    let best = best.ok_or(ClassifierError::EmptyPredictions)?;
    Ok(ClassificationResult {
        label: best.label.clone(),
        confidence: sanitize(best.confidence),
    })
}

fn sanitize(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Classify and select the winner in one call.
pub fn classify_top(
    classifier: &dyn ImageClassifier,
    image: &RgbImage,
) -> Result<ClassificationResult, ClassifierError> {
    let predictions = classifier.classify(image)?;
    select_top(&predictions)
}

// ═══════════════════════════════════════════════════════════
// Startup initialization
// ═══════════════════════════════════════════════════════════

/// Load the production classifier from `model_dir`.
///
/// Falls back to `UnavailableClassifier` when the model cannot be loaded
/// (or the `onnx-classifier` feature is off) so the API still serves
/// history, strings and expert requests.
pub fn load_classifier(model_dir: &std::path::Path) -> SharedClassifier {
    #[cfg(feature = "onnx-classifier")]
    {
        match super::onnx::OnnxClassifier::load(model_dir) {
            Ok(classifier) => return Arc::new(classifier),
            Err(e) => {
                tracing::warn!(error = %e, dir = %model_dir.display(), "Leaf classifier unavailable");
                return Arc::new(UnavailableClassifier::new(e.to_string()));
            }
        }
    }

    #[cfg(not(feature = "onnx-classifier"))]
    {
        tracing::warn!(
            dir = %model_dir.display(),
            "Built without `onnx-classifier`; diagnosis requests will fail"
        );
        Arc::new(UnavailableClassifier::new(
            "built without the onnx-classifier feature",
        ))
    }
}

/// Stand-in used when no model could be loaded. Every call fails.
pub struct UnavailableClassifier {
    reason: String,
}

impl UnavailableClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ImageClassifier for UnavailableClassifier {
    fn classify(&self, _image: &RgbImage) -> Result<Vec<Prediction>, ClassifierError> {
        Err(ClassifierError::ModelUnavailable(self.reason.clone()))
    }

    fn model_name(&self) -> &str {
        "unavailable"
    }

    fn is_ready(&self) -> bool {
        false
    }
}

/// Mock classifier for testing; returns fixed predictions.
pub struct MockClassifier {
    predictions: Vec<Prediction>,
}

impl MockClassifier {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    /// Single fixed winner.
    pub fn returning(label: &str, confidence: f32) -> Self {
        Self::new(vec![Prediction::new(label, confidence)])
    }
}

impl ImageClassifier for MockClassifier {
    fn classify(&self, _image: &RgbImage) -> Result<Vec<Prediction>, ClassifierError> {
        Ok(self.predictions.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn leaf() -> RgbImage {
        RgbImage::from_pixel(8, 8, Rgb([30, 160, 40]))
    }

    #[test]
    fn select_top_picks_highest() {
        let preds = vec![
            Prediction::new("Tomato_healthy", 0.10),
            Prediction::new("Tomato_Early_blight", 0.82),
            Prediction::new("Tomato_Late_blight", 0.08),
        ];
        let top = select_top(&preds).unwrap();
        assert_eq!(top.label, "Tomato_Early_blight");
        assert!((top.confidence - 0.82).abs() < f32::EPSILON);
    }

    #[test]
    fn select_top_unsorted_input() {
        let preds = vec![
            Prediction::new("a", 0.2),
            Prediction::new("b", 0.3),
            Prediction::new("c", 0.5),
        ];
        assert_eq!(select_top(&preds).unwrap().label, "c");
    }

    #[test]
    fn select_top_tie_keeps_first() {
        let preds = vec![Prediction::new("first", 0.5), Prediction::new("second", 0.5)];
        assert_eq!(select_top(&preds).unwrap().label, "first");
    }

    #[test]
    fn select_top_empty_is_error() {
        assert!(matches!(
            select_top(&[]),
            Err(ClassifierError::EmptyPredictions)
        ));
    }

    #[test]
    fn select_top_clamps_out_of_range() {
        let top = select_top(&[Prediction::new("x", 1.7)]).unwrap();
        assert_eq!(top.confidence, 1.0);
        let top = select_top(&[Prediction::new("y", f32::NAN)]).unwrap();
        assert_eq!(top.confidence, 0.0);
    }

    #[test]
    fn unavailable_classifier_fails() {
        let classifier = UnavailableClassifier::new("missing model.onnx");
        assert!(!classifier.is_ready());
        let err = classifier.classify(&leaf()).unwrap_err();
        assert!(err.to_string().contains("missing model.onnx"));
    }

    #[test]
    fn classify_top_uses_mock() {
        let classifier = MockClassifier::returning("Potato___Late_blight", 0.91);
        let result = classify_top(&classifier, &leaf()).unwrap();
        assert_eq!(result.label, "Potato___Late_blight");
    }

    #[test]
    fn classify_top_propagates_failure() {
        let classifier = UnavailableClassifier::new("offline");
        assert!(matches!(
            classify_top(&classifier, &leaf()),
            Err(ClassifierError::ModelUnavailable(_))
        ));
    }

    #[cfg(not(feature = "onnx-classifier"))]
    #[test]
    fn load_without_feature_is_unavailable() {
        let classifier = load_classifier(std::path::Path::new("/nonexistent"));
        assert!(!classifier.is_ready());
    }
}
