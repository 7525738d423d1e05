//! Result Formatting and Reference Tables

use crate::engine::{FailureType, Prediction};
use crate::InferenceError;
use data_validator::MachineType;
use serde::Serialize;

/// Label shown as the failure type when no failure is predicted
pub const NO_FAILURE: &str = "No Failure";

/// Display-ready prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionReport {
    /// Whether a failure was predicted
    pub machine_failure: bool,
    /// Predicted failure type code, when a failure was predicted
    pub failure_type: Option<FailureType>,
    /// `Machine Failure Prediction: Yes|No`
    pub failure_prediction: String,
    /// `Predicted Failure Type: <label>`
    pub failure_type_label: String,
}

impl PredictionReport {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let verdict = if prediction.is_failure() { "Yes" } else { "No" };
        let type_label = prediction
            .failure_type()
            .map(FailureType::label)
            .unwrap_or(NO_FAILURE);

        Self {
            machine_failure: prediction.is_failure(),
            failure_type: prediction.failure_type().cloned(),
            failure_prediction: format!("Machine Failure Prediction: {}", verdict),
            failure_type_label: format!("Predicted Failure Type: {}", type_label),
        }
    }

    /// Both result lines, verdict first
    pub fn lines(&self) -> [&str; 2] {
        [self.failure_prediction.as_str(), self.failure_type_label.as_str()]
    }
}

/// Message shown when either model fails
pub fn error_message(err: &InferenceError) -> String {
    format!("Error during prediction: {}", err)
}

/// One row of a reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub code: String,
    pub description: String,
}

/// Static lookup tables shown alongside the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceTables {
    /// Failure type abbreviations and full names
    pub failure_types: Vec<ReferenceEntry>,
    /// Type codes and weight class descriptions
    pub machine_types: Vec<ReferenceEntry>,
}

pub fn reference_tables() -> ReferenceTables {
    ReferenceTables {
        failure_types: FailureType::KNOWN
            .iter()
            .map(|t| ReferenceEntry {
                code: t.code().to_string(),
                description: t.label().to_string(),
            })
            .collect(),
        machine_types: MachineType::ALL
            .iter()
            .map(|t| ReferenceEntry {
                code: t.code().to_string(),
                description: t.label().to_string(),
            })
            .collect(),
    }
}
