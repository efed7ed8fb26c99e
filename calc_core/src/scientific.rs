//! # Scientific Functions
//!
//! Single-argument functions available in scientific mode. Trigonometric
//! functions take their input in degrees.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::scientific::{evaluate, ScientificFunction};
//!
//! let half = evaluate(ScientificFunction::Sin, 30.0).unwrap();
//! assert!((half - 0.5).abs() < 1e-12);
//!
//! assert!(evaluate(ScientificFunction::SquareRoot, -1.0).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{check_finite, CalcError, CalcResult};

/// A single-argument scientific function (or constant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScientificFunction {
    Sin,
    Cos,
    Tan,
    Square,
    Cube,
    SquareRoot,
    Log10,
    NaturalLog,
    Reciprocal,
    Pi,
    Euler,
}

impl ScientificFunction {
    /// All functions in keypad order.
    pub const ALL: [ScientificFunction; 11] = [
        ScientificFunction::Sin,
        ScientificFunction::Cos,
        ScientificFunction::Tan,
        ScientificFunction::Square,
        ScientificFunction::Cube,
        ScientificFunction::SquareRoot,
        ScientificFunction::Log10,
        ScientificFunction::NaturalLog,
        ScientificFunction::Reciprocal,
        ScientificFunction::Pi,
        ScientificFunction::Euler,
    ];

    /// Keypad label
    pub fn label(&self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Square => "x²",
            ScientificFunction::Cube => "x³",
            ScientificFunction::SquareRoot => "√",
            ScientificFunction::Log10 => "log",
            ScientificFunction::NaturalLog => "ln",
            ScientificFunction::Reciprocal => "1/x",
            ScientificFunction::Pi => "π",
            ScientificFunction::Euler => "e",
        }
    }

    /// Spoken name
    pub fn name(&self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sine",
            ScientificFunction::Cos => "cosine",
            ScientificFunction::Tan => "tangent",
            ScientificFunction::Square => "square",
            ScientificFunction::Cube => "cube",
            ScientificFunction::SquareRoot => "square root",
            ScientificFunction::Log10 => "logarithm",
            ScientificFunction::NaturalLog => "natural logarithm",
            ScientificFunction::Reciprocal => "reciprocal",
            ScientificFunction::Pi => "pi",
            ScientificFunction::Euler => "euler",
        }
    }

    /// Constants ignore the display value.
    pub fn is_constant(&self) -> bool {
        matches!(self, ScientificFunction::Pi | ScientificFunction::Euler)
    }
}

impl fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScientificFunction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let function = match key.as_str() {
            "sin" | "sine" => ScientificFunction::Sin,
            "cos" | "cosine" => ScientificFunction::Cos,
            "tan" | "tangent" => ScientificFunction::Tan,
            "x²" | "x^2" | "sq" | "square" => ScientificFunction::Square,
            "x³" | "x^3" | "cube" => ScientificFunction::Cube,
            "√" | "sqrt" | "square root" => ScientificFunction::SquareRoot,
            "log" | "log10" | "logarithm" => ScientificFunction::Log10,
            "ln" | "natural logarithm" => ScientificFunction::NaturalLog,
            "1/x" | "inv" | "reciprocal" => ScientificFunction::Reciprocal,
            "π" | "pi" => ScientificFunction::Pi,
            "e" | "euler" => ScientificFunction::Euler,
            _ => return Err(CalcError::unknown_function(s.trim())),
        };
        Ok(function)
    }
}

/// Evaluate `function` at `x`.
///
/// # Errors
///
/// * `DomainError` - square root of a negative, log/ln of a non-positive,
///   reciprocal of zero
/// * `Overflow` - the result is not finite (e.g. cube of `1e200`)
pub fn evaluate(function: ScientificFunction, x: f64) -> CalcResult<f64> {
    let op = function.name();
    let result = match function {
        ScientificFunction::Sin => x.to_radians().sin(),
        ScientificFunction::Cos => x.to_radians().cos(),
        ScientificFunction::Tan => x.to_radians().tan(),
        ScientificFunction::Square => x.powi(2),
        ScientificFunction::Cube => x.powi(3),
        ScientificFunction::SquareRoot => {
            if x < 0.0 {
                return Err(CalcError::domain(op, x, "Input must not be negative"));
            }
            x.sqrt()
        }
        ScientificFunction::Log10 => {
            if x <= 0.0 {
                return Err(CalcError::domain(op, x, "Input must be positive"));
            }
            x.log10()
        }
        ScientificFunction::NaturalLog => {
            if x <= 0.0 {
                return Err(CalcError::domain(op, x, "Input must be positive"));
            }
            x.ln()
        }
        ScientificFunction::Reciprocal => {
            if x == 0.0 {
                return Err(CalcError::domain(op, x, "Cannot divide by zero"));
            }
            1.0 / x
        }
        ScientificFunction::Pi => std::f64::consts::PI,
        ScientificFunction::Euler => std::f64::consts::E,
    };
    check_finite(op, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_trig_uses_degrees() {
        assert!(close(evaluate(ScientificFunction::Sin, 90.0).unwrap(), 1.0));
        assert!(close(evaluate(ScientificFunction::Cos, 60.0).unwrap(), 0.5));
        assert!(close(evaluate(ScientificFunction::Tan, 45.0).unwrap(), 1.0));
    }

    #[test]
    fn test_powers_and_roots() {
        assert_eq!(evaluate(ScientificFunction::Square, -3.0).unwrap(), 9.0);
        assert_eq!(evaluate(ScientificFunction::Cube, 2.0).unwrap(), 8.0);
        assert_eq!(evaluate(ScientificFunction::SquareRoot, 16.0).unwrap(), 4.0);
        assert_eq!(evaluate(ScientificFunction::Reciprocal, 4.0).unwrap(), 0.25);
    }

    #[test]
    fn test_logarithms() {
        assert!(close(evaluate(ScientificFunction::Log10, 1000.0).unwrap(), 3.0));
        assert!(close(evaluate(ScientificFunction::NaturalLog, std::f64::consts::E).unwrap(), 1.0));
    }

    #[test]
    fn test_domain_errors() {
        let err = evaluate(ScientificFunction::SquareRoot, -1.0).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert!(evaluate(ScientificFunction::Log10, 0.0).is_err());
        assert!(evaluate(ScientificFunction::NaturalLog, -2.0).is_err());
        assert!(evaluate(ScientificFunction::Reciprocal, 0.0).is_err());
    }

    #[test]
    fn test_overflow() {
        let err = evaluate(ScientificFunction::Cube, 1e200).unwrap_err();
        assert_eq!(err.error_code(), "OVERFLOW");
    }

    #[test]
    fn test_constants_ignore_input() {
        assert_eq!(evaluate(ScientificFunction::Pi, -99.0).unwrap(), std::f64::consts::PI);
        assert_eq!(evaluate(ScientificFunction::Euler, 0.0).unwrap(), std::f64::consts::E);
        assert!(ScientificFunction::Pi.is_constant());
    }

    #[test]
    fn test_parse_labels_and_names() {
        for function in ScientificFunction::ALL {
            assert_eq!(function.label().parse::<ScientificFunction>().unwrap(), function);
            assert_eq!(function.name().parse::<ScientificFunction>().unwrap(), function);
        }
        assert!("cosh".parse::<ScientificFunction>().is_err());
    }
}
