//! # Financial Calculations
//!
//! Nine closed-form formulas used by financial mode. Each calculation
//! follows the pattern:
//!
//! - [`FinancialInput`] - tagged input parameters (JSON-serializable)
//! - [`FinancialResult`] - numeric value plus the display string
//! - [`calculate`] - pure function from input to result
//!
//! Rates are always given in percent (`5.0` means 5 %).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::financial::{calculate, FinancialInput};
//!
//! let input = FinancialInput::CompoundInterest {
//!     principal: 1000.0,
//!     rate_percent: 5.0,
//!     years: 3.0,
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.display, "1157.63");
//! ```
//!
//! ## JSON Example
//!
//! ```json
//! { "type": "Roi", "initial_value": 10000.0, "final_value": 15000.0 }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{check_finite, require_finite, CalcError, CalcResult};
use crate::format::format_fixed;

// ============================================================================
// Payment Frequency
// ============================================================================

/// How often annuity payments are made (and interest compounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 4] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::SemiAnnual,
        PaymentFrequency::Annual,
    ];

    pub fn payments_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::SemiAnnual => "Semi-Annual",
            PaymentFrequency::Annual => "Annual",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match key.as_str() {
            "monthly" | "12" => Ok(PaymentFrequency::Monthly),
            "quarterly" | "4" => Ok(PaymentFrequency::Quarterly),
            "semiannual" | "2" => Ok(PaymentFrequency::SemiAnnual),
            "annual" | "yearly" | "1" => Ok(PaymentFrequency::Annual),
            _ => Err(CalcError::invalid_input(
                "frequency",
                s,
                "Expected monthly, quarterly, semi-annual or annual",
            )),
        }
    }
}

// ============================================================================
// Calculation Types
// ============================================================================

/// The nine financial calculations, used for menus and help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialCalculationType {
    Compound,
    Simple,
    Loan,
    FutureValue,
    PresentValue,
    Annuity,
    Roi,
    BreakEven,
    Depreciation,
}

impl FinancialCalculationType {
    pub const ALL: [FinancialCalculationType; 9] = [
        FinancialCalculationType::Compound,
        FinancialCalculationType::Simple,
        FinancialCalculationType::Loan,
        FinancialCalculationType::FutureValue,
        FinancialCalculationType::PresentValue,
        FinancialCalculationType::Annuity,
        FinancialCalculationType::Roi,
        FinancialCalculationType::BreakEven,
        FinancialCalculationType::Depreciation,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FinancialCalculationType::Compound => "Compound Interest",
            FinancialCalculationType::Simple => "Simple Interest",
            FinancialCalculationType::Loan => "Loan Payment",
            FinancialCalculationType::FutureValue => "Future Value",
            FinancialCalculationType::PresentValue => "Present Value",
            FinancialCalculationType::Annuity => "Annuity",
            FinancialCalculationType::Roi => "Return on Investment",
            FinancialCalculationType::BreakEven => "Break-even Point",
            FinancialCalculationType::Depreciation => "Depreciation",
        }
    }

    /// Short command-line name (`compound`, `loan`, `break-even`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            FinancialCalculationType::Compound => "compound",
            FinancialCalculationType::Simple => "simple",
            FinancialCalculationType::Loan => "loan",
            FinancialCalculationType::FutureValue => "future-value",
            FinancialCalculationType::PresentValue => "present-value",
            FinancialCalculationType::Annuity => "annuity",
            FinancialCalculationType::Roi => "roi",
            FinancialCalculationType::BreakEven => "break-even",
            FinancialCalculationType::Depreciation => "depreciation",
        }
    }

    /// Names of the numeric arguments, in order.
    pub fn argument_names(&self) -> &'static [&'static str] {
        match self {
            FinancialCalculationType::Compound
            | FinancialCalculationType::Simple
            | FinancialCalculationType::Loan => &["principal", "rate_percent", "years"],
            FinancialCalculationType::FutureValue => &["present_value", "rate_percent", "years"],
            FinancialCalculationType::PresentValue => &["future_value", "rate_percent", "years"],
            FinancialCalculationType::Annuity => &["payment", "rate_percent", "years"],
            FinancialCalculationType::Roi => &["initial_value", "final_value"],
            FinancialCalculationType::BreakEven => &["fixed_costs", "price_per_unit", "variable_cost_per_unit"],
            FinancialCalculationType::Depreciation => &["initial_value", "salvage_value", "useful_life_years"],
        }
    }

    /// Formula with a legend of its symbols.
    pub fn formula(&self) -> &'static str {
        match self {
            FinancialCalculationType::Compound => {
                "A = P(1 + r)^t\nwhere:\nA = Final amount\nP = Principal\nr = Interest rate\nt = Time"
            }
            FinancialCalculationType::Simple => {
                "I = P × r × t\nwhere:\nI = Interest\nP = Principal\nr = Interest rate\nt = Time"
            }
            FinancialCalculationType::Loan => {
                "PMT = P × (r(1 + r)^n)/((1 + r)^n - 1)\nwhere:\nPMT = Payment\nP = Principal\nr = Monthly rate\nn = Number of payments"
            }
            FinancialCalculationType::FutureValue => {
                "FV = PV(1 + r)^t\nwhere:\nFV = Future Value\nPV = Present Value\nr = Interest rate\nt = Time"
            }
            FinancialCalculationType::PresentValue => {
                "PV = FV/(1 + r)^t\nwhere:\nPV = Present Value\nFV = Future Value\nr = Interest rate\nt = Time"
            }
            FinancialCalculationType::Annuity => {
                "FV = PMT × ((1 + r)^n - 1)/r\nwhere:\nFV = Future Value\nPMT = Payment\nr = Rate per period\nn = Number of payments"
            }
            FinancialCalculationType::Roi => {
                "ROI = ((FV - IV)/IV) × 100\nwhere:\nROI = Return on Investment\nFV = Final Value\nIV = Initial Value"
            }
            FinancialCalculationType::BreakEven => {
                "BE = FC/(P - VC)\nwhere:\nBE = Break-even point\nFC = Fixed Costs\nP = Price per unit\nVC = Variable Cost per unit"
            }
            FinancialCalculationType::Depreciation => {
                "D = (IV - SV)/n\nwhere:\nD = Annual Depreciation\nIV = Initial Value\nSV = Salvage Value\nn = Useful Life"
            }
        }
    }

    /// Worked example matching the formula.
    pub fn example(&self) -> &'static str {
        match self {
            FinancialCalculationType::Compound => "Initial: $1,000\nRate: 5%\nTime: 3 years\nResult: $1,157.63",
            FinancialCalculationType::Simple => "Initial: $1,000\nRate: 5%\nTime: 3 years\nResult: $1,150.00",
            FinancialCalculationType::Loan => "Amount: $200,000\nRate: 4.5%\nTerm: 30 years\nResult: $1,013.37/month",
            FinancialCalculationType::FutureValue => "Initial: $5,000\nRate: 6%\nTime: 5 years\nResult: $6,691.13",
            FinancialCalculationType::PresentValue => "Future: $10,000\nRate: 5%\nTime: 3 years\nResult: $8,638.38",
            FinancialCalculationType::Annuity => "Payment: $500/month\nRate: 6%\nTime: 10 years\nResult: $81,939.67",
            FinancialCalculationType::Roi => "Investment: $10,000\nFinal: $15,000\nResult: 50% ROI",
            FinancialCalculationType::BreakEven => {
                "Fixed Costs: $100,000\nPrice: $50\nVariable Cost: $30\nResult: 5,000 units"
            }
            FinancialCalculationType::Depreciation => {
                "Initial: $50,000\nSalvage: $5,000\nLife: 5 years\nResult: $9,000/year"
            }
        }
    }
}

impl fmt::Display for FinancialCalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FinancialCalculationType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        FinancialCalculationType::ALL
            .into_iter()
            .find(|t| t.key() == key || t.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::unknown_function(s.trim()))
    }
}

// ============================================================================
// Input / Result
// ============================================================================

/// Input parameters for one financial calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FinancialInput {
    CompoundInterest {
        principal: f64,
        rate_percent: f64,
        years: f64,
    },
    SimpleInterest {
        principal: f64,
        rate_percent: f64,
        years: f64,
    },
    /// Monthly payment on an amortized loan
    LoanPayment {
        principal: f64,
        rate_percent: f64,
        years: f64,
    },
    FutureValue {
        present_value: f64,
        rate_percent: f64,
        years: f64,
    },
    PresentValue {
        future_value: f64,
        rate_percent: f64,
        years: f64,
    },
    /// Future value of a series of equal payments
    Annuity {
        payment: f64,
        rate_percent: f64,
        years: f64,
        #[serde(default)]
        frequency: PaymentFrequency,
    },
    Roi {
        initial_value: f64,
        final_value: f64,
    },
    BreakEven {
        fixed_costs: f64,
        price_per_unit: f64,
        variable_cost_per_unit: f64,
    },
    /// Straight-line depreciation
    Depreciation {
        initial_value: f64,
        salvage_value: f64,
        useful_life_years: f64,
    },
}

impl FinancialInput {
    /// Build an input from positional arguments, in the order given by
    /// [`FinancialCalculationType::argument_names`].
    pub fn from_args(
        calculation: FinancialCalculationType,
        args: &[f64],
        frequency: PaymentFrequency,
    ) -> CalcResult<Self> {
        let expected = calculation.argument_names();
        if args.len() != expected.len() {
            return Err(CalcError::invalid_input(
                calculation.key(),
                format!("{} arguments", args.len()),
                format!("Expected {}: {}", expected.len(), expected.join(", ")),
            ));
        }
        let input = match calculation {
            FinancialCalculationType::Compound => FinancialInput::CompoundInterest {
                principal: args[0],
                rate_percent: args[1],
                years: args[2],
            },
            FinancialCalculationType::Simple => FinancialInput::SimpleInterest {
                principal: args[0],
                rate_percent: args[1],
                years: args[2],
            },
            FinancialCalculationType::Loan => FinancialInput::LoanPayment {
                principal: args[0],
                rate_percent: args[1],
                years: args[2],
            },
            FinancialCalculationType::FutureValue => FinancialInput::FutureValue {
                present_value: args[0],
                rate_percent: args[1],
                years: args[2],
            },
            FinancialCalculationType::PresentValue => FinancialInput::PresentValue {
                future_value: args[0],
                rate_percent: args[1],
                years: args[2],
            },
            FinancialCalculationType::Annuity => FinancialInput::Annuity {
                payment: args[0],
                rate_percent: args[1],
                years: args[2],
                frequency,
            },
            FinancialCalculationType::Roi => FinancialInput::Roi {
                initial_value: args[0],
                final_value: args[1],
            },
            FinancialCalculationType::BreakEven => FinancialInput::BreakEven {
                fixed_costs: args[0],
                price_per_unit: args[1],
                variable_cost_per_unit: args[2],
            },
            FinancialCalculationType::Depreciation => FinancialInput::Depreciation {
                initial_value: args[0],
                salvage_value: args[1],
                useful_life_years: args[2],
            },
        };
        Ok(input)
    }

    pub fn calculation_type(&self) -> FinancialCalculationType {
        match self {
            FinancialInput::CompoundInterest { .. } => FinancialCalculationType::Compound,
            FinancialInput::SimpleInterest { .. } => FinancialCalculationType::Simple,
            FinancialInput::LoanPayment { .. } => FinancialCalculationType::Loan,
            FinancialInput::FutureValue { .. } => FinancialCalculationType::FutureValue,
            FinancialInput::PresentValue { .. } => FinancialCalculationType::PresentValue,
            FinancialInput::Annuity { .. } => FinancialCalculationType::Annuity,
            FinancialInput::Roi { .. } => FinancialCalculationType::Roi,
            FinancialInput::BreakEven { .. } => FinancialCalculationType::BreakEven,
            FinancialInput::Depreciation { .. } => FinancialCalculationType::Depreciation,
        }
    }

    /// Numeric fields with their names, for validation and descriptions.
    fn fields(&self) -> Vec<(&'static str, f64)> {
        let names = self.calculation_type().argument_names();
        let values: Vec<f64> = match *self {
            FinancialInput::CompoundInterest { principal, rate_percent, years }
            | FinancialInput::SimpleInterest { principal, rate_percent, years }
            | FinancialInput::LoanPayment { principal, rate_percent, years } => vec![principal, rate_percent, years],
            FinancialInput::FutureValue { present_value, rate_percent, years } => {
                vec![present_value, rate_percent, years]
            }
            FinancialInput::PresentValue { future_value, rate_percent, years } => {
                vec![future_value, rate_percent, years]
            }
            FinancialInput::Annuity { payment, rate_percent, years, .. } => vec![payment, rate_percent, years],
            FinancialInput::Roi { initial_value, final_value } => vec![initial_value, final_value],
            FinancialInput::BreakEven { fixed_costs, price_per_unit, variable_cost_per_unit } => {
                vec![fixed_costs, price_per_unit, variable_cost_per_unit]
            }
            FinancialInput::Depreciation { initial_value, salvage_value, useful_life_years } => {
                vec![initial_value, salvage_value, useful_life_years]
            }
        };
        names.iter().copied().zip(values).collect()
    }

    /// Reject NaN/infinite inputs.
    pub fn validate(&self) -> CalcResult<()> {
        for (name, value) in self.fields() {
            require_finite(name, value)?;
        }
        Ok(())
    }

    /// One-line description used as the history "calculation" text.
    pub fn describe(&self) -> String {
        let args: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        let mut text = format!("{}: {}", self.calculation_type().display_name(), args.join(", "));
        if let FinancialInput::Annuity { frequency, .. } = self {
            text.push_str(&format!(", frequency={}", frequency.display_name()));
        }
        text
    }
}

/// Result of a financial calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    pub calculation: FinancialCalculationType,
    /// Unrounded numeric result
    pub value: f64,
    /// Formatted result (`"1157.63"`, `"50.00%"`, `"5000 units"`, ...)
    pub display: String,
}

/// Run a financial calculation.
///
/// # Errors
///
/// * `InvalidInput` - an input is NaN or infinite
/// * `DomainError` - a zero denominator (ROI with zero initial value,
///   break-even with price equal to variable cost, zero useful life,
///   loan with zero term)
/// * `Overflow` - the result is not finite
pub fn calculate(input: &FinancialInput) -> CalcResult<FinancialResult> {
    input.validate()?;
    let calculation = input.calculation_type();

    let value = match *input {
        FinancialInput::CompoundInterest { principal, rate_percent, years } => {
            compound_interest(principal, rate_percent, years)?
        }
        FinancialInput::SimpleInterest { principal, rate_percent, years } => {
            simple_interest(principal, rate_percent, years)?
        }
        FinancialInput::LoanPayment { principal, rate_percent, years } => loan_payment(principal, rate_percent, years)?,
        FinancialInput::FutureValue { present_value, rate_percent, years } => {
            future_value(present_value, rate_percent, years)?
        }
        FinancialInput::PresentValue { future_value, rate_percent, years } => {
            present_value(future_value, rate_percent, years)?
        }
        FinancialInput::Annuity { payment, rate_percent, years, frequency } => {
            annuity_future_value(payment, rate_percent, years, frequency)?
        }
        FinancialInput::Roi { initial_value, final_value } => return_on_investment(initial_value, final_value)?,
        FinancialInput::BreakEven { fixed_costs, price_per_unit, variable_cost_per_unit } => {
            break_even_units(fixed_costs, price_per_unit, variable_cost_per_unit)?
        }
        FinancialInput::Depreciation { initial_value, salvage_value, useful_life_years } => {
            straight_line_depreciation(initial_value, salvage_value, useful_life_years)?
        }
    };

    let shown = match calculation {
        FinancialCalculationType::Roi => format!("{}%", format_fixed(value, 2)),
        FinancialCalculationType::BreakEven => format!("{} units", format_fixed(value, 0)),
        FinancialCalculationType::Depreciation => format!("{} per year", format_fixed(value, 2)),
        _ => format_fixed(value, 2),
    };
    debug!(calculation = %calculation, value, result = %shown, "financial calculation complete");

    Ok(FinancialResult {
        calculation,
        value,
        display: shown,
    })
}

// ============================================================================
// Formulas
// ============================================================================

/// P·(1 + r/100)^t
pub fn compound_interest(principal: f64, rate_percent: f64, years: f64) -> CalcResult<f64> {
    finish(
        FinancialCalculationType::Compound,
        principal * (1.0 + rate_percent / 100.0).powf(years),
    )
}

/// P + P·r·t/100
pub fn simple_interest(principal: f64, rate_percent: f64, years: f64) -> CalcResult<f64> {
    finish(
        FinancialCalculationType::Simple,
        principal + principal * rate_percent * years / 100.0,
    )
}

/// Monthly payment for a loan of `principal` over `years`, monthly rate r/1200.
///
/// A zero rate (or one too small to change `(1 + r)^n`) degenerates to
/// `principal / payments`.
pub fn loan_payment(principal: f64, rate_percent: f64, years: f64) -> CalcResult<f64> {
    let kind = FinancialCalculationType::Loan;
    let payments = years * 12.0;
    if payments == 0.0 {
        return Err(CalcError::domain(kind.display_name(), years, "Loan term must not be zero"));
    }
    let monthly_rate = rate_percent / 1200.0;
    let growth = (1.0 + monthly_rate).powf(payments);
    if monthly_rate == 0.0 || growth == 1.0 {
        return finish(kind, principal / payments);
    }
    finish(kind, principal * monthly_rate * growth / (growth - 1.0))
}

/// PV·(1 + r/100)^t
pub fn future_value(present_value: f64, rate_percent: f64, years: f64) -> CalcResult<f64> {
    finish(
        FinancialCalculationType::FutureValue,
        present_value * (1.0 + rate_percent / 100.0).powf(years),
    )
}

/// FV / (1 + r/100)^t
pub fn present_value(future_value: f64, rate_percent: f64, years: f64) -> CalcResult<f64> {
    let kind = FinancialCalculationType::PresentValue;
    let growth = (1.0 + rate_percent / 100.0).powf(years);
    if growth == 0.0 {
        return Err(CalcError::domain(kind.display_name(), rate_percent, "Rate of -100% has no present value"));
    }
    finish(kind, future_value / growth)
}

/// Future value of `years · frequency` equal payments compounding at
/// `rate / frequency` per period. A zero rate degenerates to `payment · n`.
pub fn annuity_future_value(
    payment: f64,
    rate_percent: f64,
    years: f64,
    frequency: PaymentFrequency,
) -> CalcResult<f64> {
    let kind = FinancialCalculationType::Annuity;
    let per_year = f64::from(frequency.payments_per_year());
    let periodic_rate = rate_percent / (100.0 * per_year);
    let periods = years * per_year;
    if periods == 0.0 {
        return Err(CalcError::domain(kind.display_name(), years, "Annuity term must not be zero"));
    }
    let growth = (1.0 + periodic_rate).powf(periods);
    if periodic_rate == 0.0 || growth == 1.0 {
        return finish(kind, payment * periods);
    }
    finish(kind, payment * (growth - 1.0) / periodic_rate)
}

/// (final − initial) / initial × 100, in percent
pub fn return_on_investment(initial_value: f64, final_value: f64) -> CalcResult<f64> {
    let kind = FinancialCalculationType::Roi;
    if initial_value == 0.0 {
        return Err(CalcError::domain(kind.display_name(), initial_value, "Initial value must not be zero"));
    }
    finish(kind, (final_value - initial_value) / initial_value * 100.0)
}

/// Units to sell before revenue covers fixed costs: FC / (price − VC)
pub fn break_even_units(fixed_costs: f64, price_per_unit: f64, variable_cost_per_unit: f64) -> CalcResult<f64> {
    let kind = FinancialCalculationType::BreakEven;
    let margin = price_per_unit - variable_cost_per_unit;
    if margin == 0.0 {
        return Err(CalcError::domain(
            kind.display_name(),
            margin,
            "Price per unit must differ from variable cost per unit",
        ));
    }
    finish(kind, fixed_costs / margin)
}

/// (initial − salvage) / life
pub fn straight_line_depreciation(initial_value: f64, salvage_value: f64, useful_life_years: f64) -> CalcResult<f64> {
    let kind = FinancialCalculationType::Depreciation;
    if useful_life_years == 0.0 {
        return Err(CalcError::domain(kind.display_name(), useful_life_years, "Useful life must not be zero"));
    }
    finish(kind, (initial_value - salvage_value) / useful_life_years)
}

fn finish(kind: FinancialCalculationType, value: f64) -> CalcResult<f64> {
    if value.is_nan() {
        return Err(CalcError::domain(kind.display_name(), value, "Result is not a real number"));
    }
    check_finite(kind.display_name(), value)
}
