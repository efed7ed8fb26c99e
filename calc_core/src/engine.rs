//! # Calculator Engine
//!
//! The calculator is an explicit state value plus a transition function:
//!
//! ```text
//! (EngineState, Action) -> EngineState
//! ```
//!
//! A front-end owns one [`EngineState`] per session, feeds it an [`Action`]
//! for every key press and re-renders [`EngineState::display_text`] and
//! [`EngineState::has_memory`] afterwards. Nothing here blocks or touches
//! I/O, so every behaviour is testable without a UI harness.
//!
//! ## Arithmetic
//!
//! Binary operators evaluate strictly left to right. Pressing an operator
//! while one is pending resolves the pending computation first and keeps
//! the intermediate result as the new left operand.
//!
//! ```rust
//! use calc_core::engine::{Action, EngineState, Operator};
//!
//! let state = EngineState::new().apply_all([
//!     Action::Digit(3),
//!     Action::Operator(Operator::Add),
//!     Action::Digit(4),
//!     Action::Operator(Operator::Multiply),
//!     Action::Digit(2),
//!     Action::Equals,
//! ]);
//! assert_eq!(state.display_text(), "14");
//! ```
//!
//! ## Errors
//!
//! Failed operations put the literal `"Error"` on the display, discard the
//! pending computation and keep the structured cause in
//! [`EngineState::error`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::format::{format_grouped, format_number, format_scientific, parse_display, ERROR_MARKER};
use crate::memory::MemoryRegister;
use crate::scientific::{self, ScientificFunction};

// ============================================================================
// Mode
// ============================================================================

/// Calculator mode (which keypad/screen the front-end shows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Standard,
    Scientific,
    Financial,
    Measurement,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Standard, Mode::Scientific, Mode::Financial, Mode::Measurement];

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Standard => "Standard",
            Mode::Scientific => "Scientific",
            Mode::Financial => "Financial",
            Mode::Measurement => "Measurement",
        }
    }

    /// Scientific function keys are shown only in scientific mode.
    pub fn shows_scientific_functions(&self) -> bool {
        matches!(self, Mode::Scientific)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Mode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::invalid_input("mode", s, "Expected standard, scientific, financial or measurement"))
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// Keypad symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Power => "^",
        }
    }

    /// Evaluate `lhs op rhs`.
    ///
    /// Division by zero and non-real powers are domain errors; results that
    /// leave the f64 range are overflow errors.
    pub fn apply(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        let result = match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => {
                if rhs == 0.0 {
                    return Err(CalcError::domain("division", lhs, "Cannot divide by zero"));
                }
                lhs / rhs
            }
            Operator::Power => lhs.powf(rhs),
        };
        if result.is_nan() {
            return Err(CalcError::domain(self.symbol(), lhs, "Result is not a real number"));
        }
        if result.is_infinite() {
            return Err(CalcError::overflow(self.symbol()));
        }
        Ok(result)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" | "−" => Ok(Operator::Subtract),
            "*" | "×" | "x" => Ok(Operator::Multiply),
            "/" | "÷" => Ok(Operator::Divide),
            "^" | "xʸ" | "**" => Ok(Operator::Power),
            other => Err(CalcError::unknown_function(other)),
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// A discrete user event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Digit key 0-9 (larger values are ignored)
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Negate,
    Percent,
    Scientific(ScientificFunction),
    MemoryClear,
    MemoryStore,
    MemoryRecall,
    MemoryAdd,
    MemorySubtract,
    SetMode(Mode),
}

impl FromStr for Action {
    type Err = CalcError;

    /// Parse a keypad token: `7`, `.`, `+`, `=`, `C`, `+/-`, `%`, `MS`,
    /// `sin`, `mode:scientific`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Some(mode) = token.strip_prefix("mode:") {
            return mode.parse().map(Action::SetMode);
        }
        if let [digit @ b'0'..=b'9'] = token.as_bytes() {
            return Ok(Action::Digit(digit - b'0'));
        }
        let action = match token.to_ascii_uppercase().as_str() {
            "." | "," => Action::Decimal,
            "=" => Action::Equals,
            "C" | "AC" | "CLEAR" => Action::Clear,
            "+/-" | "±" | "NEG" => Action::Negate,
            "%" => Action::Percent,
            "MC" => Action::MemoryClear,
            "MS" => Action::MemoryStore,
            "MR" => Action::MemoryRecall,
            "M+" => Action::MemoryAdd,
            "M-" => Action::MemorySubtract,
            _ => {
                return token
                    .parse::<Operator>()
                    .map(Action::Operator)
                    .or_else(|_| token.parse::<ScientificFunction>().map(Action::Scientific))
                    .map_err(|_| CalcError::invalid_input("key", token, "Unrecognised key"));
            }
        };
        Ok(action)
    }
}

// ============================================================================
// Engine State
// ============================================================================

/// Left operand and operator captured while waiting for the right operand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub operand: f64,
    pub operator: Operator,
}

/// Complete calculator state for one session.
///
/// The display text always parses as a finite number (see
/// [`parse_display`]) or equals [`ERROR_MARKER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    display: String,
    pending: Option<PendingOperation>,
    reset_on_next_digit: bool,
    memory: MemoryRegister,
    mode: Mode,
    error: Option<CalcError>,
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState {
            display: "0".to_string(),
            pending: None,
            reset_on_next_digit: false,
            memory: MemoryRegister::new(),
            mode: Mode::Standard,
            error: None,
        }
    }
}

impl EngineState {
    /// Fresh engine: display `0`, standard mode, empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action, returning the next state.
    pub fn apply(mut self, action: Action) -> Self {
        debug!(?action, display = %self.display, "applying action");
        match action {
            Action::Digit(digit) => self.press_digit(digit),
            Action::Decimal => self.press_decimal(),
            Action::Operator(op) => self.press_operator(op),
            Action::Equals => self.press_equals(),
            Action::Clear => self.clear(),
            Action::Negate => self.transform_display(|v| -v),
            Action::Percent => self.transform_display(|v| v / 100.0),
            Action::Scientific(function) => self.apply_function(function),
            Action::MemoryClear => self.memory.clear(),
            Action::MemoryStore => self.update_memory(|memory, value| {
                memory.store(value);
                Ok(())
            }),
            Action::MemoryAdd => self.update_memory(MemoryRegister::add),
            Action::MemorySubtract => self.update_memory(MemoryRegister::subtract),
            Action::MemoryRecall => self.recall_memory(),
            Action::SetMode(mode) => {
                self.clear();
                self.mode = mode;
            }
        }
        self
    }

    /// Apply a sequence of actions in order.
    pub fn apply_all(self, actions: impl IntoIterator<Item = Action>) -> Self {
        actions.into_iter().fold(self, EngineState::apply)
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    /// Text the front-end should render.
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// Numeric value of the display, `None` in the error state.
    pub fn display_value(&self) -> Option<f64> {
        if self.error.is_some() {
            return None;
        }
        parse_display(&self.display)
    }

    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    pub fn pending_operand(&self) -> Option<f64> {
        self.pending.map(|p| p.operand)
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending.map(|p| p.operator)
    }

    /// Left side of the expression in progress, e.g. `"3 +"`.
    pub fn pending_expression(&self) -> Option<String> {
        self.pending
            .map(|p| format!("{} {}", format_number(p.operand), p.operator.symbol()))
    }

    pub fn reset_on_next_digit(&self) -> bool {
        self.reset_on_next_digit
    }

    pub fn has_memory(&self) -> bool {
        self.memory.has_value()
    }

    pub fn memory(&self) -> &MemoryRegister {
        &self.memory
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Cause of the current error display, if any.
    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn press_digit(&mut self, digit: u8) {
        if digit > 9 {
            debug!(digit, "ignoring out-of-range digit");
            return;
        }
        if self.starts_fresh_entry() || self.display == "0" {
            self.display = digit.to_string();
            self.error = None;
        } else {
            self.display.push(char::from(b'0' + digit));
            if parse_display(&self.display).is_none() {
                return self.enter_error(CalcError::overflow("digit entry"));
            }
        }
        self.reset_on_next_digit = false;
    }

    fn press_decimal(&mut self) {
        if self.starts_fresh_entry() {
            self.display = "0.".to_string();
            self.error = None;
            self.reset_on_next_digit = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Typing replaces the display after a result, on the error display, and
    /// over exponent notation, which cannot be extended digit by digit.
    fn starts_fresh_entry(&self) -> bool {
        self.reset_on_next_digit || self.error.is_some() || self.display.contains('e')
    }

    fn press_operator(&mut self, op: Operator) {
        let Some(value) = self.display_value() else {
            debug!(%op, "operator ignored on error display");
            return;
        };
        let operand = match self.pending.take() {
            Some(pending) => match pending.operator.apply(pending.operand, value) {
                Ok(result) => {
                    self.display = format_number(result);
                    result
                }
                Err(e) => return self.enter_error(e),
            },
            None => value,
        };
        self.pending = Some(PendingOperation { operand, operator: op });
        self.reset_on_next_digit = true;
    }

    fn press_equals(&mut self) {
        if let (Some(pending), Some(value)) = (self.pending.take(), self.display_value()) {
            match pending.operator.apply(pending.operand, value) {
                Ok(result) => self.display = format_number(result),
                Err(e) => return self.enter_error(e),
            }
        }
        self.reset_on_next_digit = true;
    }

    fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending = None;
        self.reset_on_next_digit = false;
        self.error = None;
    }

    fn transform_display(&mut self, f: impl FnOnce(f64) -> f64) {
        if let Some(value) = self.display_value() {
            self.display = format_number(f(value));
        }
    }

    fn apply_function(&mut self, function: ScientificFunction) {
        let input = if function.is_constant() {
            0.0
        } else {
            match self.display_value() {
                Some(value) => value,
                None => return,
            }
        };
        match scientific::evaluate(function, input) {
            Ok(result) => {
                self.display = format_scientific(result);
                self.error = None;
                self.reset_on_next_digit = true;
            }
            Err(e) => self.enter_error(e),
        }
    }

    fn update_memory(&mut self, f: impl FnOnce(&mut MemoryRegister, f64) -> CalcResult<()>) {
        let Some(value) = self.display_value() else {
            return;
        };
        match f(&mut self.memory, value) {
            Ok(()) => self.reset_on_next_digit = true,
            Err(e) => self.enter_error(e),
        }
    }

    fn recall_memory(&mut self) {
        if let Some(value) = self.memory.recall() {
            self.display = format_grouped(value);
            self.error = None;
            self.reset_on_next_digit = true;
        }
    }

    fn enter_error(&mut self, error: CalcError) {
        debug!(%error, "engine entered error state");
        self.display = ERROR_MARKER.to_string();
        self.pending = None;
        self.reset_on_next_digit = true;
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(tokens: &str) -> EngineState {
        let actions = tokens
            .split_whitespace()
            .map(|t| t.parse::<Action>().unwrap());
        EngineState::new().apply_all(actions)
    }

    #[test]
    fn test_initial_state() {
        let state = EngineState::new();
        assert_eq!(state.display_text(), "0");
        assert!(state.pending().is_none());
        assert!(!state.has_memory());
        assert_eq!(state.mode(), Mode::Standard);
    }

    #[test]
    fn test_digit_entry_replaces_leading_zero() {
        assert_eq!(keys("0 0 7").display_text(), "7");
        assert_eq!(keys("1 2 3").display_text(), "123");
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let state = EngineState::new().apply(Action::Digit(12));
        assert_eq!(state.display_text(), "0");
    }

    #[test]
    fn test_decimal_only_once() {
        assert_eq!(keys("1 . 5 . 2").display_text(), "1.52");
        assert_eq!(keys(". 5").display_text(), "0.5");
    }

    #[test]
    fn test_decimal_after_operator_starts_fresh() {
        let state = keys("8 + . 5");
        assert_eq!(state.display_text(), "0.5");
        assert_eq!(keys("8 + . 5 =").display_text(), "8.5");
    }

    #[test]
    fn test_simple_addition() {
        assert_eq!(keys("1 2 + 3 0 =").display_text(), "42");
    }

    #[test]
    fn test_chained_left_to_right() {
        let state = keys("3 + 4 ×");
        assert_eq!(state.display_text(), "7");
        assert_eq!(state.pending_operand(), Some(7.0));
        assert_eq!(state.pending_operator(), Some(Operator::Multiply));

        let state = state.apply(Action::Digit(2)).apply(Action::Equals);
        assert_eq!(state.display_text(), "14");
        assert!(state.pending().is_none());
    }

    #[test]
    fn test_second_operator_resolves_with_display() {
        // No operand typed after `+`, so the display (3) is used as the right side.
        let state = keys("3 + ×");
        assert_eq!(state.display_text(), "6");
        assert_eq!(
            state.pending(),
            Some(PendingOperation {
                operand: 6.0,
                operator: Operator::Multiply,
            })
        );
        assert_eq!(state.pending_expression().as_deref(), Some("6 ×"));
    }

    #[test]
    fn test_runaway_digit_entry_overflows() {
        let state = EngineState::new().apply_all(std::iter::repeat(Action::Digit(9)).take(309));
        assert_eq!(state.display_text(), ERROR_MARKER);
        assert_eq!(state.error().unwrap().error_code(), "OVERFLOW");

        let state = state.apply(Action::Digit(1)).apply(Action::Operator(Operator::Add));
        let state = state.apply(Action::Digit(1)).apply(Action::Equals);
        assert_eq!(state.display_text(), "2");
    }

    #[test]
    fn test_long_entry_stays_a_number() {
        let state = EngineState::new().apply_all(std::iter::repeat(Action::Digit(9)).take(300));
        assert!(!state.is_error());
        assert!(state.display_value().is_some());
    }

    #[test]
    fn test_typing_over_exponent_display_starts_fresh() {
        let state = keys("1 0 0 0 0 0 0 0 0 0 0 × 1 0 0 0 0 0 0 0 0 0 0 0 0 0 =");
        assert_eq!(state.display_text(), "1e23");
        let state = keys("1 0 0 0 0 0 0 0 0 0 0 × 1 0 0 0 0 0 0 0 0 0 0 0 0 0 = +/- 5");
        assert_eq!(state.display_text(), "5");
        let state = keys("1 0 0 0 0 0 0 0 0 0 0 × 1 0 0 0 0 0 0 0 0 0 0 0 0 0 = +/- .");
        assert_eq!(state.display_text(), "0.");
    }

    #[test]
    fn test_subtract_and_power() {
        assert_eq!(keys("5 - 8 =").display_text(), "-3");
        assert_eq!(keys("2 ^ 1 0 =").display_text(), "1024");
    }

    #[test]
    fn test_fractional_result() {
        assert_eq!(keys("7 ÷ 2 =").display_text(), "3.5");
    }

    #[test]
    fn test_division_by_zero_is_error() {
        let state = keys("5 ÷ 0 =");
        assert_eq!(state.display_text(), ERROR_MARKER);
        assert!(state.is_error());
        assert!(state.pending().is_none());
        assert_eq!(state.error().unwrap().error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_division_by_zero_while_chaining() {
        let state = keys("5 ÷ 0 +");
        assert_eq!(state.display_text(), ERROR_MARKER);
        assert!(state.pending().is_none());
    }

    #[test]
    fn test_overflow_is_error() {
        let state = keys("9 ^ 9 9 9 =");
        assert_eq!(state.display_text(), ERROR_MARKER);
        assert_eq!(state.error().unwrap().error_code(), "OVERFLOW");
    }

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let state = keys("5 ÷ 0 = 4");
        assert_eq!(state.display_text(), "4");
        assert!(!state.is_error());
    }

    #[test]
    fn test_operator_ignored_on_error() {
        let state = keys("5 ÷ 0 = +");
        assert_eq!(state.display_text(), ERROR_MARKER);
        assert!(state.pending().is_none());
    }

    #[test]
    fn test_equals_without_pending() {
        let state = keys("4 2 =");
        assert_eq!(state.display_text(), "42");
        assert!(state.reset_on_next_digit());
        assert_eq!(state.apply(Action::Digit(1)).display_text(), "1");
    }

    #[test]
    fn test_result_used_as_next_operand() {
        assert_eq!(keys("2 + 3 = × 4 =").display_text(), "20");
    }

    #[test]
    fn test_clear_resets_but_keeps_memory() {
        let state = keys("9 MS + 1 C");
        assert_eq!(state.display_text(), "0");
        assert!(state.pending().is_none());
        assert!(!state.reset_on_next_digit());
        assert!(state.has_memory());
    }

    #[test]
    fn test_negate_and_percent_leave_pending_alone() {
        let state = keys("1 0 + 5 0 %");
        assert_eq!(state.display_text(), "0.5");
        assert_eq!(state.pending_operand(), Some(10.0));

        let state = state.apply(Action::Negate);
        assert_eq!(state.display_text(), "-0.5");
        assert_eq!(state.apply(Action::Equals).display_text(), "9.5");
    }

    #[test]
    fn test_negate_zero_stays_zero() {
        assert_eq!(keys("+/-").display_text(), "0");
    }

    #[test]
    fn test_scientific_action() {
        let state = keys("9 sqrt");
        assert_eq!(state.display_text(), "3");
        assert!(state.reset_on_next_digit());

        assert_eq!(keys("3 0 sin").display_text(), "0.5");
        assert_eq!(keys("pi").display_text(), "3.141593");
    }

    #[test]
    fn test_scientific_domain_error() {
        let state = keys("4 +/- √");
        assert_eq!(state.display_text(), ERROR_MARKER);
        assert_eq!(state.error().unwrap().error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_memory_round_trip() {
        let state = keys("5 MS C MR");
        assert_eq!(state.display_text(), "5");
        assert!(state.has_memory());
    }

    #[test]
    fn test_memory_recall_without_value_is_noop() {
        let state = keys("7 MR");
        assert_eq!(state.display_text(), "7");
        assert!(!state.has_memory());
    }

    #[test]
    fn test_memory_accumulates_and_groups() {
        let state = keys("1 0 0 0 M+ 2 3 4 . 5 M+ 4 M- C MR");
        assert_eq!(state.display_text(), "1,230.5");
        assert_eq!(state.display_value(), Some(1230.5));
    }

    #[test]
    fn test_memory_clear() {
        let state = keys("5 MS MC");
        assert!(!state.has_memory());
        assert_eq!(state.memory().value(), 0.0);
    }

    #[test]
    fn test_recalled_value_feeds_arithmetic() {
        let state = keys("1 2 0 0 MS C 2 × MR =");
        assert_eq!(state.display_text(), "2400");
    }

    #[test]
    fn test_mode_change_clears() {
        let state = keys("4 + 5 mode:scientific");
        assert_eq!(state.mode(), Mode::Scientific);
        assert_eq!(state.display_text(), "0");
        assert!(state.pending().is_none());
        assert!(state.mode().shows_scientific_functions());
    }

    #[test]
    fn test_pending_expression() {
        assert_eq!(keys("1 2 ÷").pending_expression().as_deref(), Some("12 ÷"));
        assert_eq!(EngineState::new().pending_expression(), None);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("7".parse::<Action>().unwrap(), Action::Digit(7));
        assert_eq!("m+".parse::<Action>().unwrap(), Action::MemoryAdd);
        assert_eq!("*".parse::<Action>().unwrap(), Action::Operator(Operator::Multiply));
        assert_eq!("ln".parse::<Action>().unwrap(), Action::Scientific(ScientificFunction::NaturalLog));
        assert_eq!("mode:financial".parse::<Action>().unwrap(), Action::SetMode(Mode::Financial));
        assert!("??".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::Operator(Operator::Divide);
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"action":"operator","value":"divide"}"#);
        let roundtrip: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, roundtrip);
    }

    #[test]
    fn test_state_serialization() {
        let state = keys("3 + 4");
        let json = serde_json::to_string(&state).unwrap();
        let roundtrip: EngineState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, roundtrip);
    }
}
