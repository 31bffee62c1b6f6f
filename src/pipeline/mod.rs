pub mod acquisition;
pub mod classifier;
pub mod knowledge;
pub mod metrics;
pub mod preprocess;
pub mod processor; // Leaf diagnosis orchestrator

#[cfg(feature = "onnx-classifier")]
pub mod onnx;

pub use acquisition::{acquire, AcquiredImage, AcquisitionError, RawImage};
pub use classifier::{select_top, ClassifierError, ImageClassifier, SharedClassifier};
pub use knowledge::{lookup_advisory, AdvisoryLookup, KnowledgeBase, KnowledgeError};
pub use metrics::SavingsReport;
pub use processor::{Diagnosis, DiagnosisProcessor, PipelineError};
