//! # calc_core - Calculator Engine
//!
//! `calc_core` is the computational heart of Calculator Plus: a pure
//! state machine for keypad arithmetic plus the scientific, financial and
//! unit conversion formula sets. All inputs and outputs are
//! JSON-serializable so any front-end (GUI, CLI, scripted tests) can drive
//! the engine and replay action logs.
//!
//! ## Design Philosophy
//!
//! - **Explicit state**: `(EngineState, Action) -> EngineState`, no hidden mutation
//! - **Pure formulas**: financial, scientific and conversion functions are stateless
//! - **Rich Errors**: structured error types alongside the `"Error"` display marker
//! - **JSON-First**: every public type implements Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::engine::{Action, EngineState, Operator};
//!
//! let state = EngineState::new()
//!     .apply(Action::Digit(5))
//!     .apply(Action::Operator(Operator::Divide))
//!     .apply(Action::Digit(0))
//!     .apply(Action::Equals);
//!
//! assert_eq!(state.display_text(), "Error");
//! assert_eq!(state.error().unwrap().error_code(), "DOMAIN_ERROR");
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Calculator state machine, operators, actions and modes
//! - [`scientific`] - Single-argument scientific functions
//! - [`memory`] - Memory register (MC/MR/MS/M+/M-)
//! - [`financial`] - Interest, loan, annuity, ROI, break-even, depreciation
//! - [`units`] - Length, weight, temperature and volume conversion
//! - [`format`] - Display formatting and parsing
//! - [`history`] - Bounded calculation log
//! - [`file_io`] - History persistence with atomic saves
//! - [`errors`] - Structured error types

pub mod engine;
pub mod errors;
pub mod file_io;
pub mod financial;
pub mod format;
pub mod history;
pub mod memory;
pub mod scientific;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use engine::{Action, EngineState, Mode, Operator};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_history, load_history_or_default, save_history};
pub use financial::{FinancialCalculationType, FinancialInput, FinancialResult, PaymentFrequency};
pub use format::ERROR_MARKER;
pub use history::{History, HistoryEntry};
pub use scientific::ScientificFunction;
pub use units::{MeasurementType, Unit};
