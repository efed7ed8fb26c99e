//! # Calculator Plus CLI Application
//!
//! Terminal front-end for calc_core. The default `repl` command behaves
//! like the keypad: every whitespace-separated token is one key press, and
//! the display is printed after each line. Other subcommands run a single
//! financial formula or unit conversion.
//!
//! Completed calculations are appended to a JSON history file
//! (`--history-file`, default `calculator_history.json`).
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=calc_core=debug`).

mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use calc_core::errors::CalcError;
use calc_core::file_io::{load_history_or_default, save_history};
use calc_core::financial::{calculate, FinancialCalculationType, FinancialInput, PaymentFrequency};
use calc_core::history::{History, HistoryEntry};
use calc_core::units::{convert_display, MeasurementType, Unit};
use calc_core::{CalcResult, EngineState, Mode};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calc_cli")]
#[command(about = "Standard, scientific, financial and measurement calculator")]
#[command(version)]
struct Cli {
    /// JSON file holding the calculation history
    #[arg(long, global = true, default_value = "calculator_history.json")]
    history_file: PathBuf,

    /// Do not record calculations in the history file
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive keypad (default)
    Repl,

    /// Press a sequence of keys and print the final display
    Keys {
        /// Keys, e.g. `3 + 4 × 2 =` or `12.5 MS C MR`
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },

    /// Run a financial formula
    Finance {
        /// compound, simple, loan, future-value, present-value, annuity,
        /// roi, break-even, depreciation
        formula: String,

        /// Formula arguments in order (see `formulas`)
        #[arg(allow_hyphen_values = true)]
        args: Vec<f64>,

        /// Payment frequency for annuities
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
    },

    /// List financial formulas with their arguments and help text
    Formulas,

    /// Convert a value between units of the same category
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },

    /// List available units
    Units,

    /// Show or clear the calculation history
    History {
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let recorder = HistoryRecorder::new(&cli.history_file, !cli.no_history);

    let outcome = match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => repl::run(&recorder),
        Command::Keys { keys } => run_keys(&keys, &recorder),
        Command::Finance { formula, args, frequency } => run_finance(&formula, &args, &frequency, &recorder),
        Command::Formulas => {
            print_formulas();
            Ok(())
        }
        Command::Convert { value, from, to } => run_convert(value, &from, &to, &recorder),
        Command::Units => {
            print_units();
            Ok(())
        }
        Command::History { clear } => run_history(&cli.history_file, clear),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Appends entries to the history file, if enabled.
pub(crate) struct HistoryRecorder {
    path: PathBuf,
    enabled: bool,
}

impl HistoryRecorder {
    fn new(path: &Path, enabled: bool) -> Self {
        HistoryRecorder {
            path: path.to_path_buf(),
            enabled,
        }
    }

    /// Load, prepend and rewrite. Failures are reported but never abort the
    /// calculation that produced the entry.
    pub(crate) fn record(&self, entry: HistoryEntry) {
        if !self.enabled {
            return;
        }
        let mut history = load_history_or_default(&self.path);
        history.record(entry);
        if let Err(e) = save_history(&history, &self.path) {
            report_error(&e);
        }
    }
}

pub(crate) fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn run_keys(keys: &[String], recorder: &HistoryRecorder) -> CalcResult<()> {
    let line = keys.join(" ");
    let state = repl::press_line(EngineState::new(), &line, recorder)?;
    println!("{}", repl::render(&state));
    Ok(())
}

fn run_finance(formula: &str, args: &[f64], frequency: &str, recorder: &HistoryRecorder) -> CalcResult<()> {
    let calculation: FinancialCalculationType = formula.parse()?;
    let frequency: PaymentFrequency = frequency.parse()?;
    let input = FinancialInput::from_args(calculation, args, frequency)?;
    let result = calculate(&input)?;

    println!("{}", calculation.display_name());
    for (name, value) in calculation.argument_names().iter().zip(args) {
        println!("  {:<24} {}", name, value);
    }
    if calculation == FinancialCalculationType::Annuity {
        println!("  {:<24} {}", "frequency", frequency.display_name());
    }
    println!("  {:<24} {}", "result", result.display);

    info!(formula = calculation.key(), result = %result.display, "financial calculation");
    recorder.record(HistoryEntry::new(Mode::Financial, input.describe(), result.display));
    Ok(())
}

fn run_convert(value: f64, from: &str, to: &str, recorder: &HistoryRecorder) -> CalcResult<()> {
    let from: Unit = from.parse()?;
    let to: Unit = to.parse()?;
    let result = convert_display(value, from, to)?;
    println!("{}", result);

    recorder.record(HistoryEntry::new(
        Mode::Measurement,
        format!("{} {} → {}", value, from.symbol(), to.symbol()),
        result,
    ));
    Ok(())
}

fn run_history(path: &Path, clear: bool) -> CalcResult<()> {
    if clear {
        save_history(&History::new(), path)?;
        println!("History cleared.");
        return Ok(());
    }
    let history = load_history_or_default(path);
    if history.is_empty() {
        println!("No calculations yet.");
        return Ok(());
    }
    for entry in &history {
        println!(
            "{}  [{:<11}] {} = {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.mode.display_name(),
            entry.calculation,
            entry.result
        );
    }
    Ok(())
}

fn print_formulas() {
    for calculation in FinancialCalculationType::ALL {
        println!("═══════════════════════════════════════");
        println!("  {} ({})", calculation.display_name(), calculation.key());
        println!("═══════════════════════════════════════");
        println!("Arguments: {}", calculation.argument_names().join(" "));
        println!();
        println!("{}", calculation.formula());
        println!();
        println!("Example:");
        println!("{}", calculation.example());
        println!();
    }
}

fn print_units() {
    for category in MeasurementType::ALL {
        let units: Vec<String> = category
            .units()
            .iter()
            .map(|u| format!("{} ({})", u.symbol(), u.name()))
            .collect();
        println!("{:<12} {}", category.display_name(), units.join(", "));
    }
}
