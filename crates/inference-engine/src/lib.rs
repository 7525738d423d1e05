//! Machine Failure Inference
//!
//! Runs a binary failure classifier and, only when it predicts a failure, a
//! failure-type classifier. Models are ONNX graphs executed with tract, or a
//! rule-based fallback when no model artifact is available.

mod classifier;
mod config;
mod engine;
mod onnx;
mod report;
mod rules;

pub use classifier::{ClassLabel, Classifier, FeatureVector, FEATURE_COUNT};
pub use config::{ModelBackend, ModelConfig};
pub use engine::{FailurePredictor, FailureType, Prediction};
pub use onnx::OnnxClassifier;
pub use report::{error_message, reference_tables, PredictionReport, ReferenceEntry, ReferenceTables};
pub use rules::{RuleClassifier, RuleOutput};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Unexpected label {label} from {model}")]
    UnexpectedLabel { model: String, label: String },
}
