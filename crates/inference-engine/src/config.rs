//! Model configuration

use serde::{Deserialize, Serialize};

/// Which classifier implementation to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// ONNX artifacts executed with tract
    Onnx,
    /// Built-in failure mode rules, no artifacts required
    Rules,
}

impl ModelBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelBackend::Onnx => "onnx",
            ModelBackend::Rules => "rules",
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Classifier backend
    pub backend: ModelBackend,

    /// Binary failure model path (ONNX backend)
    pub failure_model_path: String,

    /// Failure type model path (ONNX backend)
    pub failure_type_model_path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Onnx,
            failure_model_path: "models/machine_failure.onnx".to_string(),
            failure_type_model_path: "models/failure_type.onnx".to_string(),
        }
    }
}

impl ModelConfig {
    /// Rule-based config, used for development and tests
    pub fn rules() -> Self {
        Self {
            backend: ModelBackend::Rules,
            ..Default::default()
        }
    }
}
