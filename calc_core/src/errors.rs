//! # Error Types
//!
//! Structured error types for calc_core. Library functions return
//! [`CalcResult`]; the engine state machine never propagates them and
//! instead records the cause alongside the `"Error"` display marker.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn checked_sqrt(x: f64) -> CalcResult<f64> {
//!     if x < 0.0 {
//!         return Err(CalcError::domain("square root", x, "Input must not be negative"));
//!     }
//!     Ok(x.sqrt())
//! }
//!
//! assert!(checked_sqrt(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (not finite, out of range, unparseable)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Input is outside the mathematical domain of the operation
    /// (negative square root, log of zero, division by zero)
    #[error("Domain error in {operation}: {value} - {reason}")]
    DomainError {
        operation: String,
        value: String,
        reason: String,
    },

    /// Result is not representable as a finite number
    #[error("Overflow in {operation}: result is too large to calculate")]
    Overflow { operation: String },

    /// Unit symbol or name not recognised
    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    /// Units belong to different measurement categories
    #[error("Cannot convert {from} to {to}: units measure different quantities")]
    IncompatibleUnits { from: String, to: String },

    /// Scientific function or financial formula name not recognised
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DomainError
    pub fn domain(operation: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::DomainError {
            operation: operation.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an Overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        CalcError::Overflow {
            operation: operation.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        CalcError::UnknownUnit { unit: unit.into() }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        CalcError::UnknownFunction { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised by the arithmetic itself rather than by
    /// bad input or I/O.
    pub fn is_math_error(&self) -> bool {
        matches!(self, CalcError::DomainError { .. } | CalcError::Overflow { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::DomainError { .. } => "DOMAIN_ERROR",
            CalcError::Overflow { .. } => "OVERFLOW",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::IncompatibleUnits { .. } => "INCOMPATIBLE_UNITS",
            CalcError::UnknownFunction { .. } => "UNKNOWN_FUNCTION",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

/// Reject NaN and infinite inputs before they reach a formula.
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"))
    }
}

/// Map a non-finite formula result to an Overflow error.
pub(crate) fn check_finite(operation: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::overflow(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::domain("square root", -4.0, "Input must not be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"DomainError\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::overflow("power").error_code(), "OVERFLOW");
        assert_eq!(CalcError::unknown_unit("parsec").error_code(), "UNKNOWN_UNIT");
        assert_eq!(
            CalcError::invalid_input("rate", "abc", "not a number").error_code(),
            "INVALID_INPUT"
        );
    }

    #[test]
    fn test_math_error_classification() {
        assert!(CalcError::domain("log", 0.0, "x must be positive").is_math_error());
        assert!(CalcError::overflow("power").is_math_error());
        assert!(!CalcError::unknown_function("foo").is_math_error());
    }

    #[test]
    fn test_finite_guards() {
        assert_eq!(require_finite("x", 2.5).unwrap(), 2.5);
        assert!(require_finite("x", f64::NAN).is_err());
        assert!(check_finite("power", f64::INFINITY).is_err());
    }
}
