//! ONNX Runtime leaf classifier, behind the `onnx-classifier` feature.
//!
//! Requires two files in the model directory:
//! - `model.onnx`: exported image-classification weights
//! - `config.json`: HuggingFace model config carrying `id2label`

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use image::RgbImage;
use ort::session::Session;
use serde::Deserialize;

use super::classifier::{ClassifierError, ImageClassifier};
use super::preprocess::{softmax, to_input_tensor, ModelInputConfig};
use crate::models::Prediction;

#[derive(Deserialize)]
struct HfModelConfig {
    id2label: HashMap<String, String>,
}

/// Real classifier using ONNX Runtime.
///
/// Uses interior mutability (Mutex) because `ort::Session::run` requires
/// `&mut self` while `ImageClassifier` exposes `&self`.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    labels: Vec<String>,
    input: ModelInputConfig,
    name: String,
}

impl OnnxClassifier {
    pub fn load(model_dir: &Path) -> Result<Self, ClassifierError> {
        let model_path = model_dir.join("model.onnx");
        let config_path = model_dir.join("config.json");

        if !model_path.exists() {
            return Err(ClassifierError::ModelUnavailable(
                model_path.display().to_string(),
            ));
        }

        let labels = load_labels(&config_path)?;

        let session = Session::builder()
            .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e: ort::Error| ClassifierError::ModelInit(format!("ONNX load failed: {e}")))?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".into());

        tracing::info!(labels = labels.len(), "Leaf classifier loaded from {}", model_dir.display());

        Ok(Self {
            session: Mutex::new(session),
            labels,
            input: ModelInputConfig::mobilenet_v2_224(),
            name,
        })
    }

    fn infer(&self, image: &RgbImage) -> Result<Vec<f32>, ClassifierError> {
        use ort::value::TensorRef;

        let crop = self.input.crop_size as usize;
        let data = to_input_tensor(image, &self.input);
        let array = ndarray::Array4::from_shape_vec((1, 3, crop, crop), data)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let tensor = TensorRef::from_array_view(&array)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::Inference(format!("ONNX inference failed: {e}")))?;

        // Output shape: [1, num_labels] logits
        let (shape, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Output extraction: {e}")))?;

        if shape.len() != 2 || shape[1] as usize != self.labels.len() {
            return Err(ClassifierError::Inference(format!(
                "Unexpected output shape: {shape:?}, expected [1, {}]",
                self.labels.len()
            )));
        }

        Ok(softmax(logits))
    }
}

impl ImageClassifier for OnnxClassifier {
    fn classify(&self, image: &RgbImage) -> Result<Vec<Prediction>, ClassifierError> {
        let probs = self.infer(image)?;
        let mut predictions: Vec<Prediction> = self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, p)| Prediction::new(label.clone(), p))
            .collect();
        predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Ok(predictions)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// Read `id2label` and order labels by class index.
fn load_labels(config_path: &Path) -> Result<Vec<String>, ClassifierError> {
    let raw = std::fs::read_to_string(config_path).map_err(|e| {
        ClassifierError::ModelUnavailable(format!("{}: {e}", config_path.display()))
    })?;
    let config: HfModelConfig = serde_json::from_str(&raw)
        .map_err(|e| ClassifierError::ModelInit(format!("config.json: {e}")))?;

    let mut indexed = Vec::with_capacity(config.id2label.len());
    for (id, label) in config.id2label {
        let idx: usize = id
            .parse()
            .map_err(|_| ClassifierError::ModelInit(format!("non-numeric label id '{id}'")))?;
        indexed.push((idx, label));
    }
    indexed.sort_by_key(|(idx, _)| *idx);

    if indexed.is_empty() {
        return Err(ClassifierError::ModelInit("config.json has no labels".into()));
    }
    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}
