//! Reading Validator

use crate::error::ValidationError;
use crate::field::{Field, InputRecord, MachineType, RawValue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Read a missing numeric field as 0.0 instead of rejecting it.
    /// Never applies to `Type`.
    pub allow_missing_as_zero: bool,
}

/// Per-field validation errors, in field order. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<Field, ValidationError>,
}

impl ValidationReport {
    /// Whether no field failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error recorded for a field, if any
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().map(|(field, err)| (*field, err))
    }

    /// Display lines of the form `<field>: <message>`
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .map(|(field, err)| format!("{}: {}", field, err))
            .collect()
    }

    fn insert(&mut self, err: ValidationError) {
        self.errors.insert(err.field(), err);
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, err) in &self.errors {
            map.serialize_entry(field.name(), &err.to_string())?;
        }
        map.end()
    }
}

/// A fully validated submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    machine_type: MachineType,
    values: [f64; 6],
}

impl Reading {
    pub fn machine_type(&self) -> MachineType {
        self.machine_type
    }

    /// Value of a field; `Type` yields its numeric code
    pub fn value(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    /// All six values in feature order
    pub fn values(&self) -> [f64; 6] {
        self.values
    }

    pub fn air_temperature_k(&self) -> f64 {
        self.value(Field::AirTemperature)
    }

    pub fn process_temperature_k(&self) -> f64 {
        self.value(Field::ProcessTemperature)
    }

    pub fn rotational_speed_rpm(&self) -> f64 {
        self.value(Field::RotationalSpeed)
    }

    pub fn torque_nm(&self) -> f64 {
        self.value(Field::Torque)
    }

    pub fn tool_wear_min(&self) -> f64 {
        self.value(Field::ToolWear)
    }
}

/// Validator for submitted readings
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Collect every field error. An empty report means the record is valid.
    pub fn validate(&self, record: &InputRecord) -> ValidationReport {
        self.check(record).err().unwrap_or_default()
    }

    /// Validate a record and produce the typed reading
    pub fn check(&self, record: &InputRecord) -> Result<Reading, ValidationReport> {
        let mut report = ValidationReport::default();
        let mut values = [0.0; 6];
        let mut machine_type = None;

        for field in Field::ALL {
            let checked = self
                .check_value(field, record.get(field))
                .and_then(|value| match field {
                    Field::Type => {
                        machine_type = Some(
                            MachineType::from_value(value)
                                .ok_or(ValidationError::UnknownMachineType)?,
                        );
                        Ok(value)
                    }
                    _ => Ok(value),
                });

            match checked {
                Ok(value) => values[field.index()] = value,
                Err(err) => {
                    debug!("Rejected {}: {}", field.key(), err);
                    report.insert(err);
                }
            }
        }

        match machine_type {
            Some(machine_type) if report.is_valid() => Ok(Reading {
                machine_type,
                values,
            }),
            _ => Err(report),
        }
    }

    /// Presence, parse and sign checks for one field
    pub fn check_value(
        &self,
        field: Field,
        raw: Option<&RawValue>,
    ) -> Result<f64, ValidationError> {
        let value = match raw {
            None => return self.missing(field),
            Some(RawValue::Number(value)) => *value,
            Some(RawValue::Unsupported(kind)) => {
                debug!("{} submitted as {}", field.key(), kind);
                return Err(ValidationError::InvalidNumber { field });
            }
            Some(RawValue::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return self.missing(field);
                }
                text.parse::<f64>()
                    .map_err(|_| ValidationError::InvalidNumber { field })?
            }
        };

        if !value.is_finite() {
            return Err(ValidationError::InvalidNumber { field });
        }
        if value < 0.0 {
            return Err(ValidationError::Negative { field });
        }
        // Models take f32 features
        if value > f64::from(f32::MAX) {
            return Err(ValidationError::InvalidNumber { field });
        }
        Ok(value)
    }

    fn missing(&self, field: Field) -> Result<f64, ValidationError> {
        if self.config.allow_missing_as_zero && field != Field::Type {
            Ok(0.0)
        } else {
            Err(ValidationError::Missing { field })
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
