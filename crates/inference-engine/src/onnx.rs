//! ONNX Classifier (tract)
//!
//! Expects a classifier graph with a single `f32 [1, 6]` input whose first
//! output is the predicted label, as produced by skl2onnx with
//! `options={"zipmap": False}`. Integer, string and integral float labels are
//! accepted.

use crate::classifier::{ClassLabel, Classifier, FeatureVector, FEATURE_COUNT};
use crate::InferenceError;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// Classifier backed by an optimized tract plan
pub struct OnnxClassifier {
    name: String,
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model from disk
    pub fn load(name: &str, path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading {} model from {}", name, path.display());

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
            })?;

        info!("Model {} loaded successfully", name);
        Ok(Self {
            name: name.to_string(),
            plan,
        })
    }

    fn run(&self, features: &FeatureVector) -> TractResult<TVec<TValue>> {
        let input = tract_ndarray::Array2::from_shape_vec(
            (1, FEATURE_COUNT),
            features.as_slice().to_vec(),
        )?;
        self.plan.run(tvec!(Tensor::from(input).into()))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassLabel, InferenceError> {
        let outputs = self
            .run(features)
            .map_err(|e| InferenceError::InferenceFailed(format!("{}: {}", self.name, e)))?;
        let label = outputs.first().ok_or_else(|| {
            InferenceError::InferenceFailed(format!("{} produced no outputs", self.name))
        })?;

        debug!("{} output: {:?}", self.name, label);
        decode_label(&self.name, label)
    }
}

/// Read the first element of a label tensor
fn decode_label(model: &str, label: &Tensor) -> Result<ClassLabel, InferenceError> {
    let shape_error = || InferenceError::InvalidInputShape {
        expected: "at least one label".to_string(),
        actual: format!("{:?}", label.shape()),
    };
    let type_error = |e: TractError| InferenceError::InferenceFailed(format!("{}: {}", model, e));

    match label.datum_type() {
        DatumType::I64 => {
            let values = label.as_slice::<i64>().map_err(type_error)?;
            values.first().map(|v| ClassLabel::Int(*v)).ok_or_else(shape_error)
        }
        DatumType::I32 => {
            let values = label.as_slice::<i32>().map_err(type_error)?;
            values.first().map(|v| ClassLabel::Int(i64::from(*v))).ok_or_else(shape_error)
        }
        DatumType::String => {
            let values = label.as_slice::<String>().map_err(type_error)?;
            values.first().map(|v| ClassLabel::Text(v.clone())).ok_or_else(shape_error)
        }
        DatumType::F32 => {
            let values = label.as_slice::<f32>().map_err(type_error)?;
            let value = *values.first().ok_or_else(shape_error)?;
            if value.fract() == 0.0 {
                Ok(ClassLabel::Int(value as i64))
            } else {
                Err(InferenceError::UnexpectedLabel {
                    model: model.to_string(),
                    label: value.to_string(),
                })
            }
        }
        other => Err(InferenceError::InferenceFailed(format!(
            "{}: unsupported label type {:?}",
            model, other
        ))),
    }
}
