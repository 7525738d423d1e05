//! Input Fields and Raw Values

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The six readings, in model feature order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Machine weight class code
    Type,
    /// Air temperature (K)
    AirTemperature,
    /// Process temperature (K)
    ProcessTemperature,
    /// Rotational speed (rpm)
    RotationalSpeed,
    /// Torque (Nm)
    Torque,
    /// Tool wear (min)
    ToolWear,
}

impl Field {
    /// All fields in feature order
    pub const ALL: [Field; 6] = [
        Field::Type,
        Field::AirTemperature,
        Field::ProcessTemperature,
        Field::RotationalSpeed,
        Field::Torque,
        Field::ToolWear,
    ];

    /// Display name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Field::Type => "Type",
            Field::AirTemperature => "Air temperature [K]",
            Field::ProcessTemperature => "Process temperature [K]",
            Field::RotationalSpeed => "Rotational speed [rpm]",
            Field::Torque => "Torque [Nm]",
            Field::ToolWear => "Tool wear [min]",
        }
    }

    /// Form and JSON key
    pub fn key(&self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::AirTemperature => "air_temperature",
            Field::ProcessTemperature => "process_temperature",
            Field::RotationalSpeed => "rotational_speed",
            Field::Torque => "torque",
            Field::ToolWear => "tool_wear",
        }
    }

    /// Position in the feature vector
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Machine weight class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    Light,
    Medium,
    Heavy,
}

impl MachineType {
    pub const ALL: [MachineType; 3] = [MachineType::Light, MachineType::Medium, MachineType::Heavy];

    /// Numeric code fed to the models
    pub fn code(&self) -> u8 {
        match self {
            MachineType::Light => 0,
            MachineType::Medium => 1,
            MachineType::Heavy => 2,
        }
    }

    /// Weight class description
    pub fn label(&self) -> &'static str {
        match self {
            MachineType::Light => "Light weight Type",
            MachineType::Medium => "Medium Weight Type",
            MachineType::Heavy => "Heavy duty operations Type",
        }
    }

    /// Map an exact code (0, 1 or 2) to a machine type
    pub fn from_value(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| f64::from(t.code()) == value)
    }

    /// Human readable list of the accepted codes
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|t| format!("{} ({})", t.code(), t.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A raw field value as entered, before parsing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Numeric entry mode
    Number(f64),
    /// Textual entry mode
    Text(String),
    /// Any other submitted shape (boolean, list, object); names the kind
    Unsupported(String),
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

/// Accepts every self-describing value so that bad shapes reach the
/// validator instead of failing the whole record
struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<RawValue, E> {
        Ok(RawValue::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<RawValue, E> {
        Ok(RawValue::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<RawValue, E> {
        Ok(RawValue::Number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<RawValue, E> {
        Ok(RawValue::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<RawValue, E> {
        Ok(RawValue::Text(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<RawValue, E> {
        Ok(RawValue::Unsupported("boolean".to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Unsupported("null".to_string()))
    }

    fn visit_bytes<E: de::Error>(self, _value: &[u8]) -> Result<RawValue, E> {
        Ok(RawValue::Unsupported("bytes".to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawValue, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawValue::Unsupported("list".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawValue, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(RawValue::Unsupported("object".to_string()))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// One submission: six optional raw values keyed by field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    #[serde(rename = "type")]
    pub machine_type: Option<RawValue>,
    pub air_temperature: Option<RawValue>,
    pub process_temperature: Option<RawValue>,
    pub rotational_speed: Option<RawValue>,
    pub torque: Option<RawValue>,
    pub tool_wear: Option<RawValue>,
}

impl InputRecord {
    /// Build a record from six values in feature order
    pub fn from_values<V: Into<RawValue>>(values: [V; 6]) -> Self {
        let mut record = Self::default();
        for (field, value) in Field::ALL.into_iter().zip(values) {
            record.set(field, Some(value.into()));
        }
        record
    }

    /// Raw value for a field
    pub fn get(&self, field: Field) -> Option<&RawValue> {
        match field {
            Field::Type => self.machine_type.as_ref(),
            Field::AirTemperature => self.air_temperature.as_ref(),
            Field::ProcessTemperature => self.process_temperature.as_ref(),
            Field::RotationalSpeed => self.rotational_speed.as_ref(),
            Field::Torque => self.torque.as_ref(),
            Field::ToolWear => self.tool_wear.as_ref(),
        }
    }

    /// Replace the raw value of a field
    pub fn set(&mut self, field: Field, value: Option<RawValue>) {
        let slot = match field {
            Field::Type => &mut self.machine_type,
            Field::AirTemperature => &mut self.air_temperature,
            Field::ProcessTemperature => &mut self.process_temperature,
            Field::RotationalSpeed => &mut self.rotational_speed,
            Field::Torque => &mut self.torque,
            Field::ToolWear => &mut self.tool_wear,
        };
        *slot = value;
    }

    /// Builder-style variant of [`InputRecord::set`]
    pub fn with(mut self, field: Field, value: impl Into<RawValue>) -> Self {
        self.set(field, Some(value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
        assert!(Field::Type < Field::ToolWear);
    }

    #[test]
    fn test_machine_type_codes() {
        assert_eq!(MachineType::from_value(0.0), Some(MachineType::Light));
        assert_eq!(MachineType::from_value(2.0), Some(MachineType::Heavy));
        assert_eq!(MachineType::from_value(1.5), None);
        assert_eq!(MachineType::from_value(3.0), None);
    }

    #[test]
    fn test_record_from_json() {
        let json = r#"{"type": 1, "air_temperature": "300.5", "torque": null}"#;
        let record: InputRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.get(Field::Type), Some(&RawValue::Number(1.0)));
        assert_eq!(
            record.get(Field::AirTemperature),
            Some(&RawValue::Text("300.5".to_string()))
        );
        assert_eq!(record.get(Field::Torque), None);
        assert_eq!(record.get(Field::ToolWear), None);
    }

    #[test]
    fn test_record_from_json_with_bad_shapes() {
        let json = r#"{"type": true, "air_temperature": [300], "torque": {"nm": 40}, "tool_wear": 7}"#;
        let record: InputRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.get(Field::Type),
            Some(&RawValue::Unsupported("boolean".to_string()))
        );
        assert_eq!(
            record.get(Field::AirTemperature),
            Some(&RawValue::Unsupported("list".to_string()))
        );
        assert_eq!(
            record.get(Field::Torque),
            Some(&RawValue::Unsupported("object".to_string()))
        );
        assert_eq!(record.get(Field::ToolWear), Some(&RawValue::Number(7.0)));
    }

    #[test]
    fn test_record_set_and_with() {
        let record = InputRecord::default().with(Field::Torque, 40.0);
        assert_eq!(record.get(Field::Torque), Some(&RawValue::Number(40.0)));

        let mut record = record;
        record.set(Field::Torque, None);
        assert_eq!(record, InputRecord::default());
    }
}
