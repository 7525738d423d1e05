//! Validation Error Types

use crate::field::{Field, MachineType};
use thiserror::Error;

/// Errors raised for a single input field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field absent or blank
    #[error("{field} is missing.")]
    Missing { field: Field },

    /// Field could not be read as a finite real number
    #[error("Invalid value for {field}. Please enter a valid number.")]
    InvalidNumber { field: Field },

    /// Field parsed but is below zero
    #[error("{field} cannot be negative.")]
    Negative { field: Field },

    /// Type code outside the closed set
    #[error("Type must be one of {}.", MachineType::choices())]
    UnknownMachineType,
}

impl ValidationError {
    /// Field the error belongs to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing { field }
            | ValidationError::InvalidNumber { field }
            | ValidationError::Negative { field } => *field,
            ValidationError::UnknownMachineType => Field::Type,
        }
    }
}
