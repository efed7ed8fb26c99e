//! # Display Formatting
//!
//! Every string the engine puts on the display goes through this module, so
//! the display always parses back as a finite number (via [`parse_display`])
//! or equals [`ERROR_MARKER`].
//!
//! Four styles are used:
//!
//! - [`format_number`] - arithmetic results, shortest round-trip decimal
//! - [`format_scientific`] - scientific function results, 6 digits
//! - [`format_grouped`] - memory recall, thousands separators, ≤ 8 decimals
//! - [`format_fixed`] - financial and conversion results, fixed decimals

/// Literal shown on the display when an operation fails.
pub const ERROR_MARKER: &str = "Error";

/// Values with a magnitude below this switch to exponent notation.
const SCIENTIFIC_LOWER: f64 = 0.000001;

/// Values with a magnitude above this switch to exponent notation.
const SCIENTIFIC_UPPER: f64 = 999999.0;

/// [`format_number`] switches to exponent notation at or above this magnitude.
const PLAIN_UPPER: f64 = 1e21;

/// [`format_number`] switches to exponent notation below this magnitude.
const PLAIN_LOWER: f64 = 1e-7;

/// Significant digits used by [`format_scientific`].
const SIGNIFICANT_DIGITS: usize = 6;

/// Maximum fractional digits used by [`format_grouped`].
pub const GROUPED_MAX_FRACTION_DIGITS: usize = 8;

/// Parse display text into a number.
///
/// Accepts grouping commas (as produced by memory recall), a trailing
/// decimal point while the user is typing, and exponent notation. Returns
/// `None` for the error marker or anything that is not a finite number.
///
/// ```rust
/// use calc_core::format::parse_display;
///
/// assert_eq!(parse_display("1,234.5"), Some(1234.5));
/// assert_eq!(parse_display("12."), Some(12.0));
/// assert_eq!(parse_display("Error"), None);
/// ```
pub fn parse_display(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format an arithmetic result.
///
/// Integral values have no fractional part (`7`, not `7.0`) and negative
/// zero becomes `0`. Very large or very small magnitudes use the shortest
/// round-trip exponent form (`1e300`, `-2.5e-9`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= PLAIN_UPPER || magnitude < PLAIN_LOWER {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Format a scientific function result.
///
/// Magnitudes below 1e-6 or above 999999 use `%g`-style exponent notation
/// with 6 significant digits (`1.23457e+06`); everything else uses 6
/// fractional digits with trailing zeros removed.
pub fn format_scientific(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude < SCIENTIFIC_LOWER || magnitude > SCIENTIFIC_UPPER {
        format_exponential(value, SIGNIFICANT_DIGITS)
    } else {
        trim_fraction(&format!("{:.*}", SIGNIFICANT_DIGITS, value))
    }
}

/// Format with thousands separators and at most `GROUPED_MAX_FRACTION_DIGITS`
/// fractional digits.
///
/// ```rust
/// use calc_core::format::format_grouped;
///
/// assert_eq!(format_grouped(5.0), "5");
/// assert_eq!(format_grouped(-1234567.125), "-1,234,567.125");
/// ```
pub fn format_grouped(value: f64) -> String {
    let rounded = trim_fraction(&format!("{:.*}", GROUPED_MAX_FRACTION_DIGITS, value));
    let (negative, digits) = match rounded.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rounded.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = group_thousands(int_part);
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if negative && grouped != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format with a fixed number of decimals, normalising negative zero.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    match formatted.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => formatted,
    }
}

/// `%.Ng`-style exponent notation: mantissa trimmed, two-digit signed exponent.
fn format_exponential(value: f64, significant: usize) -> String {
    let raw = format!("{:.*e}", significant.saturating_sub(1), value);
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let mantissa = trim_fraction(mantissa);
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

/// Strip trailing zeros after a decimal point, then a dangling point.
fn trim_fraction(formatted: &str) -> String {
    if !formatted.contains('.') {
        return formatted.to_string();
    }
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_number_integral() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-14.0), "-14");
    }

    #[test]
    fn test_format_number_extreme_magnitudes_stay_short() {
        assert_eq!(format_number(1e300), "1e300");
        assert_eq!(format_number(-2.5e-300), "-2.5e-300");
        assert_eq!(format_number(123456789012.0), "123456789012");
        assert_eq!(format_number(0.000123), "0.000123");
        assert_eq!(parse_display(&format_number(1e300)), Some(1e300));
    }

    #[test]
    fn test_format_scientific_fixed_range() {
        assert_eq!(format_scientific(0.5), "0.5");
        assert_eq!(format_scientific(1.0), "1");
        assert_eq!(format_scientific(3.14159265), "3.141593");
        assert_eq!(format_scientific(-42.0), "-42");
    }

    #[test]
    fn test_format_scientific_exponent_range() {
        assert_eq!(format_scientific(1234567.0), "1.23457e+06");
        assert_eq!(format_scientific(0.0000001), "1e-07");
        assert_eq!(format_scientific(-2.5e-9), "-2.5e-09");
        assert_eq!(format_scientific(0.0), "0");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(5.0), "5");
        assert_eq!(format_grouped(1234.5), "1,234.5");
        assert_eq!(format_grouped(1000000.0), "1,000,000");
        assert_eq!(format_grouped(0.123456789), "0.12345679");
        assert_eq!(format_grouped(-999.0), "-999");
        assert_eq!(format_grouped(-0.000000001), "0");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(1157.6250000000002, 2), "1157.63");
        assert_eq!(format_fixed(-0.001, 2), "0.00");
        assert_eq!(format_fixed(-5.5, 1), "-5.5");
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("0"), Some(0.0));
        assert_eq!(parse_display("-3.5"), Some(-3.5));
        assert_eq!(parse_display("1.23457e+06"), Some(1234570.0));
        assert_eq!(parse_display(ERROR_MARKER), None);
        assert_eq!(parse_display("inf"), None);
    }

    proptest! {
        #[test]
        fn prop_number_display_round_trips(x in -1.0e12f64..1.0e12) {
            prop_assert_eq!(parse_display(&format_number(x)), Some(x + 0.0));
        }

        #[test]
        fn prop_number_display_is_bounded(x in proptest::num::f64::NORMAL) {
            let text = format_number(x);
            prop_assert!(text.len() <= 32, "{} is too long", text);
            prop_assert_eq!(parse_display(&text), Some(x));
        }

        #[test]
        fn prop_scientific_display_parses(x in -1.0e9f64..1.0e9) {
            prop_assert!(parse_display(&format_scientific(x)).is_some());
        }

        #[test]
        fn prop_grouped_display_parses_close(x in -1.0e9f64..1.0e9) {
            let parsed = parse_display(&format_grouped(x)).unwrap();
            prop_assert!((parsed - x).abs() < 1e-8 + x.abs() * 1e-15);
        }
    }
}
