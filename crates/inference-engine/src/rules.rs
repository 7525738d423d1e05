//! Rule-Based Classifier
//!
//! Failure mode definitions of the AI4I 2020 predictive maintenance data set.
//! Used in place of the ONNX models when no artifacts are deployed.

use crate::classifier::{ClassLabel, Classifier, FeatureVector};
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Tool wear window that triggers a tool replacement failure (min)
const TOOL_WEAR_FAILURE: (f32, f32) = (200.0, 240.0);
/// Minimum healthy process/air temperature difference (K)
const HEAT_DISSIPATION_DELTA_K: f32 = 8.6;
/// Speed below which heat dissipation is insufficient (rpm)
const HEAT_DISSIPATION_SPEED_RPM: f32 = 1380.0;
/// Healthy power band (W)
const POWER_BAND_W: (f32, f32) = (3500.0, 9000.0);
/// Overstrain limits (min * Nm) for Light, Medium, Heavy
const OVERSTRAIN_LIMITS: [f32; 3] = [11000.0, 12000.0, 13000.0];

/// What the rule classifier reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOutput {
    /// `1` when any failure mode triggers, else `0`
    Failure,
    /// Code of the first triggered failure mode
    FailureType,
}

/// Threshold classifier over the six raw features
pub struct RuleClassifier {
    output: RuleOutput,
}

impl RuleClassifier {
    pub fn new(output: RuleOutput) -> Self {
        Self { output }
    }

    /// Failure mode codes triggered by a feature vector, in check order
    pub fn triggered_modes(features: &FeatureVector) -> Vec<&'static str> {
        let [machine_type, air_k, process_k, speed_rpm, torque_nm, wear_min] = features.values;
        let mut modes = Vec::new();

        if (TOOL_WEAR_FAILURE.0..=TOOL_WEAR_FAILURE.1).contains(&wear_min) {
            modes.push("TWF");
        }
        if process_k - air_k < HEAT_DISSIPATION_DELTA_K && speed_rpm < HEAT_DISSIPATION_SPEED_RPM {
            modes.push("HDF");
        }
        let power_w = torque_nm * speed_rpm * 2.0 * PI / 60.0;
        if !(POWER_BAND_W.0..=POWER_BAND_W.1).contains(&power_w) {
            modes.push("PWF");
        }
        let limit = OVERSTRAIN_LIMITS
            .get(machine_type as usize)
            .copied()
            .unwrap_or(OVERSTRAIN_LIMITS[0]);
        if wear_min * torque_nm > limit {
            modes.push("OSF");
        }

        modes
    }
}

impl Classifier for RuleClassifier {
    fn name(&self) -> &str {
        match self.output {
            RuleOutput::Failure => "failure-rules",
            RuleOutput::FailureType => "failure-type-rules",
        }
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassLabel, InferenceError> {
        let modes = Self::triggered_modes(features);
        let label = match self.output {
            RuleOutput::Failure => ClassLabel::Int(i64::from(!modes.is_empty())),
            // Failures no rule explains are random failures
            RuleOutput::FailureType => ClassLabel::from(modes.first().copied().unwrap_or("RNF")),
        };
        Ok(label)
    }
}
