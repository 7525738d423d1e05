//! Two-Stage Failure Predictor

use crate::classifier::{ClassLabel, Classifier, FeatureVector};
use crate::config::{ModelBackend, ModelConfig};
use crate::onnx::OnnxClassifier;
use crate::rules::{RuleClassifier, RuleOutput};
use crate::InferenceError;
use data_validator::Reading;
use serde::{Serialize, Serializer};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Failure category predicted by the failure type model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureType {
    /// Tool wear failure (TWF)
    ToolWear,
    /// Heat dissipation failure (HDF)
    HeatDissipation,
    /// Power failure (PWF)
    Power,
    /// Overstrain failure (OSF)
    Overstrain,
    /// Random failure (RNF)
    Random,
    /// Any code outside the known table, kept verbatim
    Other(String),
}

impl FailureType {
    /// Known failure types in table order
    pub const KNOWN: [FailureType; 5] = [
        FailureType::ToolWear,
        FailureType::HeatDissipation,
        FailureType::Power,
        FailureType::Overstrain,
        FailureType::Random,
    ];

    /// Parse a model label
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "TWF" => FailureType::ToolWear,
            "HDF" => FailureType::HeatDissipation,
            "PWF" => FailureType::Power,
            "OSF" => FailureType::Overstrain,
            "RNF" => FailureType::Random,
            other => FailureType::Other(other.to_string()),
        }
    }

    /// Abbreviation as emitted by the model
    pub fn code(&self) -> &str {
        match self {
            FailureType::ToolWear => "TWF",
            FailureType::HeatDissipation => "HDF",
            FailureType::Power => "PWF",
            FailureType::Overstrain => "OSF",
            FailureType::Random => "RNF",
            FailureType::Other(code) => code,
        }
    }

    /// Full name, or the raw code when unrecognized
    pub fn label(&self) -> &str {
        match self {
            FailureType::ToolWear => "Tool Wear Failure",
            FailureType::HeatDissipation => "Heat Dissipation Failure",
            FailureType::Power => "Power Failure",
            FailureType::Overstrain => "Overstrain Failure",
            FailureType::Random => "Random Failure",
            FailureType::Other(code) => code,
        }
    }
}

impl From<ClassLabel> for FailureType {
    fn from(label: ClassLabel) -> Self {
        match label {
            ClassLabel::Text(code) => FailureType::from_code(&code),
            ClassLabel::Int(code) => FailureType::Other(code.to_string()),
        }
    }
}

impl Serialize for FailureType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Outcome of a successful prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Prediction {
    /// Failure predicted, with its category
    Failure { failure_type: FailureType },
    /// No failure predicted; the type model was not consulted
    NoFailure,
}

impl Prediction {
    pub fn is_failure(&self) -> bool {
        matches!(self, Prediction::Failure { .. })
    }

    pub fn failure_type(&self) -> Option<&FailureType> {
        match self {
            Prediction::Failure { failure_type } => Some(failure_type),
            Prediction::NoFailure => None,
        }
    }
}

/// Holds both loaded models and runs them in sequence
pub struct FailurePredictor {
    failure_model: Box<dyn Classifier>,
    failure_type_model: Box<dyn Classifier>,
}

impl FailurePredictor {
    /// Create a predictor from two loaded classifiers
    pub fn new(
        failure_model: Box<dyn Classifier>,
        failure_type_model: Box<dyn Classifier>,
    ) -> Self {
        Self {
            failure_model,
            failure_type_model,
        }
    }

    /// Load both classifiers described by the config
    pub fn from_config(config: &ModelConfig) -> Result<Self, InferenceError> {
        info!("Creating failure predictor with {} backend", config.backend.as_str());

        let predictor = match config.backend {
            ModelBackend::Onnx => Self::new(
                Box::new(OnnxClassifier::load("failure", &config.failure_model_path)?),
                Box::new(OnnxClassifier::load(
                    "failure-type",
                    &config.failure_type_model_path,
                )?),
            ),
            ModelBackend::Rules => Self::rules(),
        };
        Ok(predictor)
    }

    /// Predictor backed by the built-in failure mode rules
    pub fn rules() -> Self {
        Self::new(
            Box::new(RuleClassifier::new(RuleOutput::Failure)),
            Box::new(RuleClassifier::new(RuleOutput::FailureType)),
        )
    }

    /// Predict whether the machine fails and, if so, how.
    ///
    /// The failure type model only runs when the failure model is positive.
    /// Any model error aborts the whole prediction.
    pub fn predict(&self, reading: &Reading) -> Result<Prediction, InferenceError> {
        let features = FeatureVector::from_reading(reading);

        let result = self.run(&features);
        match &result {
            Ok(prediction) => {
                let outcome = if prediction.is_failure() { "failure" } else { "no_failure" };
                metrics::counter!("predictions_total", "outcome" => outcome).increment(1);
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                metrics::counter!("inference_errors_total").increment(1);
            }
        }
        result
    }

    fn run(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let failure_label = timed(self.failure_model.as_ref(), features)?;
        let failed = failure_label
            .as_binary()
            .ok_or_else(|| InferenceError::UnexpectedLabel {
                model: self.failure_model.name().to_string(),
                label: failure_label.to_string(),
            })?;

        if !failed {
            return Ok(Prediction::NoFailure);
        }

        let type_label = timed(self.failure_type_model.as_ref(), features)?;
        Ok(Prediction::Failure {
            failure_type: FailureType::from(type_label),
        })
    }

    /// Names of the failure and failure type models
    pub fn model_names(&self) -> (&str, &str) {
        (self.failure_model.name(), self.failure_type_model.name())
    }
}

fn timed(model: &dyn Classifier, features: &FeatureVector) -> Result<ClassLabel, InferenceError> {
    let start = Instant::now();
    let label = model.predict(features)?;
    let elapsed = start.elapsed();

    metrics::histogram!("inference_latency_seconds", "model" => model.name().to_string())
        .record(elapsed.as_secs_f64());
    debug!(
        "{} predicted {} in {}us",
        model.name(),
        label,
        elapsed.as_micros()
    );
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::{InputRecord, Validator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Classifier returning a fixed label and counting its calls
    struct FixedClassifier {
        label: Result<ClassLabel, String>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedClassifier {
        fn new(label: Result<ClassLabel, String>) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let classifier = Box::new(Self {
                label,
                calls: Arc::clone(&calls),
            });
            (classifier, calls)
        }
    }

    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, _features: &FeatureVector) -> Result<ClassLabel, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.label.clone().map_err(InferenceError::InferenceFailed)
        }
    }

    fn reading() -> Reading {
        let record = InputRecord::from_values([0.0, 300.0, 310.0, 1500.0, 40.0, 10.0]);
        Validator::default().check(&record).unwrap()
    }

    #[test]
    fn test_no_failure_skips_type_model() {
        let (failure, _) = FixedClassifier::new(Ok(ClassLabel::Int(0)));
        let (failure_type, type_calls) = FixedClassifier::new(Ok(ClassLabel::from("TWF")));
        let predictor = FailurePredictor::new(failure, failure_type);

        assert_eq!(predictor.predict(&reading()).unwrap(), Prediction::NoFailure);
        assert_eq!(type_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_runs_type_model() {
        let (failure, failure_calls) = FixedClassifier::new(Ok(ClassLabel::Int(1)));
        let (failure_type, type_calls) = FixedClassifier::new(Ok(ClassLabel::from("TWF")));
        let predictor = FailurePredictor::new(failure, failure_type);

        let prediction = predictor.predict(&reading()).unwrap();
        assert_eq!(
            prediction,
            Prediction::Failure {
                failure_type: FailureType::ToolWear
            }
        );
        assert_eq!(failure_calls.load(Ordering::SeqCst), 1);
        assert_eq!(type_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_model_error() {
        let (failure, _) = FixedClassifier::new(Err("bad input".to_string()));
        let (failure_type, type_calls) = FixedClassifier::new(Ok(ClassLabel::from("TWF")));
        let predictor = FailurePredictor::new(failure, failure_type);

        let err = predictor.predict(&reading()).unwrap_err();
        assert_eq!(err.to_string(), "Inference failed: bad input");
        assert_eq!(type_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_type_model_error_yields_no_partial_result() {
        let (failure, _) = FixedClassifier::new(Ok(ClassLabel::Int(1)));
        let (failure_type, _) = FixedClassifier::new(Err("type model crashed".to_string()));
        let predictor = FailurePredictor::new(failure, failure_type);

        assert!(matches!(
            predictor.predict(&reading()),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_unexpected_failure_label() {
        let (failure, _) = FixedClassifier::new(Ok(ClassLabel::Int(7)));
        let (failure_type, _) = FixedClassifier::new(Ok(ClassLabel::from("TWF")));
        let predictor = FailurePredictor::new(failure, failure_type);

        assert!(matches!(
            predictor.predict(&reading()),
            Err(InferenceError::UnexpectedLabel { .. })
        ));
    }

    #[test]
    fn test_failure_type_codes() {
        for failure_type in FailureType::KNOWN {
            assert_eq!(FailureType::from_code(failure_type.code()), failure_type);
        }
        assert_eq!(FailureType::from_code("HDF").label(), "Heat Dissipation Failure");

        let unknown = FailureType::from(ClassLabel::from("XYZ"));
        assert_eq!(unknown, FailureType::Other("XYZ".to_string()));
        assert_eq!(unknown.label(), "XYZ");
        assert_eq!(FailureType::from(ClassLabel::Int(3)).label(), "3");
    }

    #[test]
    fn test_rules_predictor() {
        let predictor = FailurePredictor::from_config(&ModelConfig::rules()).unwrap();
        assert_eq!(predictor.predict(&reading()).unwrap(), Prediction::NoFailure);

        let record = InputRecord::from_values([0.0, 300.0, 310.0, 1500.0, 40.0, 230.0]);
        let worn = Validator::default().check(&record).unwrap();
        assert_eq!(
            predictor.predict(&worn).unwrap().failure_type(),
            Some(&FailureType::ToolWear)
        );
    }

    #[test]
    fn test_missing_onnx_artifacts() {
        let config = ModelConfig {
            failure_model_path: "missing/failure.onnx".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            FailurePredictor::from_config(&config),
            Err(InferenceError::ModelLoadError(_))
        ));
    }
}
