//! Machine Reading Validation
//!
//! Provides presence, type and sign checks for the six readings submitted to
//! the failure predictor.

mod error;
mod field;
mod validator;

pub use error::ValidationError;
pub use field::{Field, InputRecord, MachineType, RawValue};
pub use validator::{Reading, ValidationConfig, ValidationReport, Validator};
