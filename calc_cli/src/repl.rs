//! Interactive keypad loop.
//!
//! Each input line is split on whitespace; every token is one key press.
//! Multi-digit literals such as `12.5` or `-3` are expanded into the digit,
//! decimal and negate keys a user would press.

use std::io::{self, BufRead, Write};

use calc_core::errors::CalcError;
use calc_core::format::format_number;
use calc_core::history::HistoryEntry;
use calc_core::{Action, CalcResult, EngineState};
use tracing::debug;

use crate::{report_error, HistoryRecorder};

const HELP: &str = "\
Keys (separate with spaces):
  0-9 .            digits and decimal point (12.5 and -3 also work)
  + - × ÷ ^        operators (* / x also accepted)
  = C +/- %        equals, clear, negate, percent
  MC MR MS M+ M-   memory
  sin cos tan x² x³ √ log ln 1/x π e
  mode:standard mode:scientific mode:financial mode:measurement
Commands: help, quit";

pub(crate) fn run(recorder: &HistoryRecorder) -> CalcResult<()> {
    println!("Calculator Plus");
    println!("===============");
    println!("Type `help` for keys, `quit` to exit.");
    println!();

    let mut state = EngineState::new();
    println!("{}", render(&state));

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|e| CalcError::file_error("flush", "stdout", e.to_string()))?;

        input.clear();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .map_err(|e| CalcError::file_error("read", "stdin", e.to_string()))?;
        if read == 0 {
            break;
        }

        match input.trim() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "help" | "?" => {
                println!("{}", HELP);
                continue;
            }
            line => match press_line(state.clone(), line, recorder) {
                Ok(next) => state = next,
                Err(e) => report_error(&e),
            },
        }
        println!("{}", render(&state));
    }
    Ok(())
}

/// Apply every token on `line`. Nothing is applied if any token is invalid.
pub(crate) fn press_line(state: EngineState, line: &str, recorder: &HistoryRecorder) -> CalcResult<EngineState> {
    let mut actions = Vec::new();
    for token in line.split_whitespace() {
        actions.extend(expand_token(token)?);
    }
    Ok(actions
        .into_iter()
        .fold(state, |state, action| press(state, action, recorder)))
}

/// One key press, recording completed calculations in the history.
fn press(state: EngineState, action: Action, recorder: &HistoryRecorder) -> EngineState {
    let calculation = match action {
        Action::Equals => state
            .pending_expression()
            .map(|lhs| format!("{} {}", lhs, state.display_text())),
        Action::Scientific(function) if function.is_constant() => None,
        Action::Scientific(function) => state
            .display_value()
            .map(|x| format!("{}({})", function.label(), format_number(x))),
        _ => None,
    };

    let next = state.apply(action);

    if let Some(calculation) = calculation {
        if next.is_error() {
            debug!(%calculation, "not recording failed calculation");
        } else {
            recorder.record(HistoryEntry::new(next.mode(), calculation, next.display_text()));
        }
    }
    next
}

fn expand_token(token: &str) -> CalcResult<Vec<Action>> {
    if let Ok(action) = token.parse::<Action>() {
        return Ok(vec![action]);
    }

    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let is_literal = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|c| *c == '.').count() <= 1;
    if !is_literal {
        return Err(CalcError::invalid_input("key", token, "Unrecognised key (type `help`)"));
    }

    let mut actions: Vec<Action> = digits
        .bytes()
        .map(|b| if b == b'.' { Action::Decimal } else { Action::Digit(b - b'0') })
        .collect();
    if negative {
        actions.push(Action::Negate);
    }
    Ok(actions)
}

/// One status line: memory indicator, pending expression, display.
pub(crate) fn render(state: &EngineState) -> String {
    let memory = if state.has_memory() { "M" } else { " " };
    let pending = state.pending_expression().unwrap_or_default();
    format!("[{}] {} {:>16} {:>20}", state.mode(), memory, pending, state.display_text())
}
