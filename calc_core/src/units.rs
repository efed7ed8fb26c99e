//! # Unit Conversion
//!
//! Measurement mode converts a value between two units of the same
//! category. Every category routes through a base unit:
//!
//! - Length: meters (m)
//! - Weight: kilograms (kg)
//! - Temperature: degrees Celsius (°C)
//! - Volume: liters (L)
//!
//! Length, weight and volume use a multiplicative factor to the base unit.
//! Temperature scales are offset from each other, so they use affine
//! formulas instead.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{convert, Unit};
//!
//! let feet = convert(1.0, Unit::Meters, Unit::Feet).unwrap();
//! assert!((feet - 3.28084).abs() < 1e-5);
//!
//! let fahrenheit = convert(100.0, Unit::Celsius, Unit::Fahrenheit).unwrap();
//! assert_eq!(fahrenheit, 212.0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{check_finite, require_finite, CalcError, CalcResult};
use crate::format::format_fixed;

// ============================================================================
// Categories
// ============================================================================

/// Kind of quantity being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementType {
    Length,
    Weight,
    Temperature,
    Volume,
}

impl MeasurementType {
    pub const ALL: [MeasurementType; 4] = [
        MeasurementType::Length,
        MeasurementType::Weight,
        MeasurementType::Temperature,
        MeasurementType::Volume,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementType::Length => "Length",
            MeasurementType::Weight => "Weight",
            MeasurementType::Temperature => "Temperature",
            MeasurementType::Volume => "Volume",
        }
    }

    /// Units in this category, in picker order.
    pub fn units(&self) -> &'static [Unit] {
        UNITS_BY_TYPE.get(self).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn base_unit(&self) -> Unit {
        match self {
            MeasurementType::Length => Unit::Meters,
            MeasurementType::Weight => Unit::Kilograms,
            MeasurementType::Temperature => Unit::Celsius,
            MeasurementType::Volume => Unit::Liters,
        }
    }

    /// Unit preselected as the source when the category is chosen.
    pub fn default_from_unit(&self) -> Unit {
        self.base_unit()
    }

    /// Unit preselected as the target when the category is chosen.
    pub fn default_to_unit(&self) -> Unit {
        match self {
            MeasurementType::Length => Unit::Feet,
            MeasurementType::Weight => Unit::Pounds,
            MeasurementType::Temperature => Unit::Fahrenheit,
            MeasurementType::Volume => Unit::Gallons,
        }
    }

    /// Decimal places shown for converted values.
    pub fn display_decimals(&self) -> usize {
        match self {
            MeasurementType::Temperature => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Units
// ============================================================================

/// A unit of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Length
    Meters,
    Kilometers,
    Feet,
    Inches,
    Miles,
    Yards,

    // Weight
    Kilograms,
    Grams,
    Pounds,
    Ounces,

    // Temperature
    Celsius,
    Fahrenheit,
    Kelvin,

    // Volume
    Liters,
    Milliliters,
    Gallons,
    Cups,
    FluidOunces,
}

impl Unit {
    pub const ALL: [Unit; 18] = [
        Unit::Meters,
        Unit::Kilometers,
        Unit::Feet,
        Unit::Inches,
        Unit::Miles,
        Unit::Yards,
        Unit::Kilograms,
        Unit::Grams,
        Unit::Pounds,
        Unit::Ounces,
        Unit::Celsius,
        Unit::Fahrenheit,
        Unit::Kelvin,
        Unit::Liters,
        Unit::Milliliters,
        Unit::Gallons,
        Unit::Cups,
        Unit::FluidOunces,
    ];

    pub fn measurement_type(&self) -> MeasurementType {
        match self {
            Unit::Meters | Unit::Kilometers | Unit::Feet | Unit::Inches | Unit::Miles | Unit::Yards => {
                MeasurementType::Length
            }
            Unit::Kilograms | Unit::Grams | Unit::Pounds | Unit::Ounces => MeasurementType::Weight,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => MeasurementType::Temperature,
            Unit::Liters | Unit::Milliliters | Unit::Gallons | Unit::Cups | Unit::FluidOunces => {
                MeasurementType::Volume
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Kilometers => "km",
            Unit::Feet => "ft",
            Unit::Inches => "in",
            Unit::Miles => "mi",
            Unit::Yards => "yd",
            Unit::Kilograms => "kg",
            Unit::Grams => "g",
            Unit::Pounds => "lb",
            Unit::Ounces => "oz",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kelvin => "K",
            Unit::Liters => "L",
            Unit::Milliliters => "mL",
            Unit::Gallons => "gal",
            Unit::Cups => "cup",
            Unit::FluidOunces => "fl oz",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Kilometers => "kilometers",
            Unit::Feet => "feet",
            Unit::Inches => "inches",
            Unit::Miles => "miles",
            Unit::Yards => "yards",
            Unit::Kilograms => "kilograms",
            Unit::Grams => "grams",
            Unit::Pounds => "pounds",
            Unit::Ounces => "ounces",
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
            Unit::Kelvin => "kelvin",
            Unit::Liters => "liters",
            Unit::Milliliters => "milliliters",
            Unit::Gallons => "gallons",
            Unit::Cups => "cups",
            Unit::FluidOunces => "fluid ounces",
        }
    }

    /// Multiplier to the category's base unit. `None` for temperature.
    pub fn factor_to_base(&self) -> Option<f64> {
        let factor = match self {
            Unit::Meters => 1.0,
            Unit::Kilometers => 1000.0,
            Unit::Feet => 0.3048,
            Unit::Inches => 0.0254,
            Unit::Miles => 1609.34,
            Unit::Yards => 0.9144,
            Unit::Kilograms => 1.0,
            Unit::Grams => 0.001,
            Unit::Pounds => 0.453592,
            Unit::Ounces => 0.0283495,
            Unit::Liters => 1.0,
            Unit::Milliliters => 0.001,
            Unit::Gallons => 3.78541,
            Unit::Cups => 0.236588,
            Unit::FluidOunces => 0.0295735,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => return None,
        };
        Some(factor)
    }

    /// Express `value` (in this unit) in the base unit.
    pub fn to_base(&self, value: f64) -> f64 {
        match self {
            Unit::Celsius => value,
            Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Unit::Kelvin => value - 273.15,
            other => value * other.factor_to_base().unwrap_or(1.0),
        }
    }

    /// Express a base-unit `value` in this unit.
    pub fn from_base(&self, value: f64) -> f64 {
        match self {
            Unit::Celsius => value,
            Unit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => value + 273.15,
            other => value / other.factor_to_base().unwrap_or(1.0),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CalcError;

    /// Parse a symbol (`ft`, `°C`, `fl oz`) or name (`feet`, `fahrenheit`).
    /// Symbols are matched case-sensitively first so `m` and `mi`, `K` and
    /// `km` stay distinct; names are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Some(unit) = Unit::ALL.into_iter().find(|u| u.symbol() == token) {
            return Ok(unit);
        }
        let lower = token.to_lowercase();
        let alias = match lower.as_str() {
            "c" | "degc" => Some(Unit::Celsius),
            "f" | "degf" => Some(Unit::Fahrenheit),
            "floz" | "fl_oz" => Some(Unit::FluidOunces),
            "l" => Some(Unit::Liters),
            "ml" => Some(Unit::Milliliters),
            "foot" => Some(Unit::Feet),
            "inch" => Some(Unit::Inches),
            _ => None,
        };
        alias
            .or_else(|| {
                Unit::ALL.into_iter().find(|u| {
                    u.name() == lower || u.name().trim_end_matches('s') == lower || u.name().replace(' ', "_") == lower
                })
            })
            .ok_or_else(|| CalcError::unknown_unit(token))
    }
}

static UNITS_BY_TYPE: Lazy<HashMap<MeasurementType, Vec<Unit>>> = Lazy::new(|| {
    let mut table: HashMap<MeasurementType, Vec<Unit>> = HashMap::new();
    for unit in Unit::ALL {
        table.entry(unit.measurement_type()).or_default().push(unit);
    }
    table
});

// ============================================================================
// Conversion
// ============================================================================

/// Convert `value` from one unit to another of the same category.
///
/// # Errors
///
/// * `IncompatibleUnits` - the units measure different quantities
/// * `InvalidInput` - `value` is not finite
pub fn convert(value: f64, from: Unit, to: Unit) -> CalcResult<f64> {
    require_finite("value", value)?;
    if from.measurement_type() != to.measurement_type() {
        return Err(CalcError::IncompatibleUnits {
            from: from.symbol().to_string(),
            to: to.symbol().to_string(),
        });
    }
    if from == to {
        return Ok(value);
    }
    check_finite("unit conversion", to.from_base(from.to_base(value)))
}

/// Convert and format for display, e.g. `"3.28 ft"` or `"212.0 °F"`.
pub fn convert_display(value: f64, from: Unit, to: Unit) -> CalcResult<String> {
    let converted = convert(value, from, to)?;
    let decimals = to.measurement_type().display_decimals();
    Ok(format!("{} {}", format_fixed(converted, decimals), to.symbol()))
}
