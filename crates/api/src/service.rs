//! Submission Pipeline
//!
//! Validation, then inference, then formatting, for one submitted record.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::{InputRecord, ValidationReport, Validator};
use inference_engine::{error_message, FailurePredictor, PredictionReport};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Submission {
    /// At least one field failed validation; no inference was attempted
    Invalid { errors: ValidationReport },
    /// Both stages completed
    #[serde(rename = "ok")]
    Predicted {
        #[serde(flatten)]
        report: PredictionReport,
    },
    /// A model failed; carries the display message
    #[serde(rename = "error")]
    Failed { message: String },
    /// The request body could not be read as a record
    #[serde(rename = "invalid")]
    Rejected {
        #[serde(skip)]
        status: StatusCode,
        errors: ValidationReport,
        message: String,
    },
}

impl Submission {
    /// Body-level rejection, reported in the same shape as field errors
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Submission::Rejected {
            status,
            errors: ValidationReport::default(),
            message: message.into(),
        }
    }
}

impl IntoResponse for Submission {
    fn into_response(self) -> Response {
        let status = match &self {
            Submission::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Submission::Predicted { .. } => StatusCode::OK,
            Submission::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Submission::Rejected { status, .. } => *status,
        };
        (status, Json(self)).into_response()
    }
}

/// Validator and predictor wired together
pub struct PredictionService {
    validator: Validator,
    predictor: FailurePredictor,
}

impl PredictionService {
    pub fn new(validator: Validator, predictor: FailurePredictor) -> Self {
        Self {
            validator,
            predictor,
        }
    }

    pub fn predictor(&self) -> &FailurePredictor {
        &self.predictor
    }

    /// Run a submission to completion
    pub fn submit(&self, record: &InputRecord) -> Submission {
        metrics::counter!("submissions_total").increment(1);

        let reading = match self.validator.check(record) {
            Ok(reading) => reading,
            Err(errors) => {
                metrics::counter!("validation_failures_total").increment(1);
                debug!("Submission rejected with {} field errors", errors.len());
                return Submission::Invalid { errors };
            }
        };

        match self.predictor.predict(&reading) {
            Ok(prediction) => {
                info!(
                    "Prediction: failure={} type={:?}",
                    prediction.is_failure(),
                    prediction.failure_type().map(|t| t.code())
                );
                Submission::Predicted {
                    report: PredictionReport::from_prediction(&prediction),
                }
            }
            Err(e) => Submission::Failed {
                message: error_message(&e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::Field;
    use inference_engine::{ClassLabel, Classifier, FeatureVector, InferenceError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingClassifier {
        label: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl Classifier for CountingClassifier {
        fn name(&self) -> &str {
            "counting"
        }

        fn predict(&self, _features: &FeatureVector) -> Result<ClassLabel, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.label
                .map(ClassLabel::from)
                .ok_or_else(|| InferenceError::InferenceFailed("model raised".to_string()))
        }
    }

    /// Service whose models answer with fixed labels; `None` makes a model fail
    fn build_service(
        failure: Option<&'static str>,
        failure_type: Option<&'static str>,
    ) -> (PredictionService, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let failure_calls = Arc::new(AtomicUsize::new(0));
        let type_calls = Arc::new(AtomicUsize::new(0));
        let predictor = FailurePredictor::new(
            Box::new(CountingClassifier {
                label: failure,
                calls: Arc::clone(&failure_calls),
            }),
            Box::new(CountingClassifier {
                label: failure_type,
                calls: Arc::clone(&type_calls),
            }),
        );
        (
            PredictionService::new(Validator::default(), predictor),
            failure_calls,
            type_calls,
        )
    }

    fn record() -> InputRecord {
        InputRecord::from_values([0.0, 300.0, 310.0, 1500.0, 40.0, 10.0])
    }

    #[test]
    fn test_no_failure_scenario() {
        let (service, _, type_calls) = build_service(Some("0"), Some("TWF"));
        match service.submit(&record()) {
            Submission::Predicted { report } => {
                assert_eq!(report.failure_prediction, "Machine Failure Prediction: No");
                assert_eq!(report.failure_type_label, "Predicted Failure Type: No Failure");
            }
            other => panic!("unexpected submission: {:?}", other),
        }
        assert_eq!(type_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_tool_wear_failure_scenario() {
        let (service, _, type_calls) = build_service(Some("1"), Some("TWF"));
        match service.submit(&record()) {
            Submission::Predicted { report } => {
                assert_eq!(report.failure_prediction, "Machine Failure Prediction: Yes");
                assert_eq!(report.failure_type_label, "Predicted Failure Type: Tool Wear Failure");
            }
            other => panic!("unexpected submission: {:?}", other),
        }
        assert_eq!(type_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_negative_torque_blocks_inference() {
        let (service, failure_calls, type_calls) = build_service(Some("1"), Some("TWF"));
        let submission = service.submit(&record().with(Field::Torque, -5.0));

        match submission {
            Submission::Invalid { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors.get(Field::Torque).map(|e| e.to_string()),
                    Some("Torque [Nm] cannot be negative.".to_string())
                );
            }
            other => panic!("unexpected submission: {:?}", other),
        }
        assert_eq!(failure_calls.load(Ordering::SeqCst), 0);
        assert_eq!(type_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_error_scenario() {
        let (service, _, _) = build_service(None, Some("TWF"));
        assert_eq!(
            service.submit(&record()),
            Submission::Failed {
                message: "Error during prediction: Inference failed: model raised".to_string()
            }
        );

        let (service, _, _) = build_service(Some("1"), None);
        assert!(matches!(service.submit(&record()), Submission::Failed { .. }));
    }

    #[test]
    fn test_json_shape() {
        let (service, _, _) = build_service(Some("0"), None);
        let json = serde_json::to_value(service.submit(&record())).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["machine_failure"], false);
        assert!(json["failure_type"].is_null());
    }
}
