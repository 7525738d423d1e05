//! Classifier Abstraction

use crate::InferenceError;
use data_validator::Reading;
use serde::Serialize;
use std::fmt;

/// Number of model input features
pub const FEATURE_COUNT: usize = 6;

/// Fixed-order model input:
/// `[type, air K, process K, speed rpm, torque Nm, wear min]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureVector {
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Coerce a validated reading into model input. Validation bounds every
    /// value to the f32 range, so the narrowing never saturates.
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            values: reading.values().map(|v| v as f32),
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

impl From<[f32; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f32; FEATURE_COUNT]) -> Self {
        Self { values }
    }
}

/// Label produced by a classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Int(i64),
    Text(String),
}

impl ClassLabel {
    /// Binary interpretation: `1` is positive, `0` negative, anything else unknown
    pub fn as_binary(&self) -> Option<bool> {
        match self {
            ClassLabel::Int(1) => Some(true),
            ClassLabel::Int(0) => Some(false),
            ClassLabel::Int(_) => None,
            ClassLabel::Text(text) => match text.trim() {
                "1" => Some(true),
                "0" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Int(value) => write!(f, "{}", value),
            ClassLabel::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ClassLabel {
    fn from(text: &str) -> Self {
        ClassLabel::Text(text.to_string())
    }
}

/// A loaded, read-only classification model
pub trait Classifier: Send + Sync {
    /// Short name used in logs and metrics
    fn name(&self) -> &str;

    /// Predict the label of a single feature vector
    fn predict(&self, features: &FeatureVector) -> Result<ClassLabel, InferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::{InputRecord, Validator};

    #[test]
    fn test_feature_order() {
        let record = InputRecord::from_values([2.0, 300.0, 310.0, 1500.0, 40.0, 10.0]);
        let reading = Validator::default().check(&record).unwrap();
        let features = FeatureVector::from_reading(&reading);
        assert_eq!(features.as_slice(), &[2.0, 300.0, 310.0, 1500.0, 40.0, 10.0]);
    }

    #[test]
    fn test_binary_labels() {
        assert_eq!(ClassLabel::Int(1).as_binary(), Some(true));
        assert_eq!(ClassLabel::Int(0).as_binary(), Some(false));
        assert_eq!(ClassLabel::from("1").as_binary(), Some(true));
        assert_eq!(ClassLabel::from("0").as_binary(), Some(false));
        assert_eq!(ClassLabel::Int(2).as_binary(), None);
        assert_eq!(ClassLabel::from("TWF").as_binary(), None);
    }
}
