use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = ZakatError> = std::result::Result<T, E>;

/// Why a field of an asset (or amount) was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ValidationReason {
    /// The field is required for this asset kind but was not supplied.
    Missing,
    /// The field must be strictly greater than zero.
    NotPositive,
    /// The field may be zero but not below it.
    Negative,
    /// The raw input could not be read as a decimal number.
    Unparsable,
    /// The field does not apply to this asset kind.
    NotApplicable,
    /// A derived amount does not fit in a decimal.
    Overflow,
}

impl ValidationReason {
    fn describe(&self) -> &'static str {
        match self {
            ValidationReason::Missing => "is required",
            ValidationReason::NotPositive => "must be greater than zero",
            ValidationReason::Negative => "must not be negative",
            ValidationReason::Unparsable => "is not a valid number",
            ValidationReason::NotApplicable => "does not apply to this asset kind",
            ValidationReason::Overflow => "is too large",
        }
    }
}

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
    /// The offending raw value, when there was one.
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Re-targets the error at another field name.
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' {}", self.field, self.reason.describe())?;
        if let Some(value) = &self.value {
            write!(f, " (got {})", value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ZakatError {
    #[error("Invalid input: {0}")]
    Validation(ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pricing error: {0}")]
    Pricing(String),
}

impl From<ValidationError> for ZakatError {
    fn from(err: ValidationError) -> Self {
        ZakatError::Validation(err)
    }
}

impl ZakatError {
    pub fn validation(field: impl Into<String>, reason: ValidationReason) -> Self {
        ZakatError::Validation(ValidationError::new(field, reason))
    }

    /// Returns the validation details if this is a validation error.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ZakatError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Kind of step recorded in a calculation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Compare,
    Rate,
    Result,
    Info,
}

impl Operation {
    fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Compare => "?",
            Operation::Rate => "x",
            Operation::Result => "=",
            Operation::Initial | Operation::Info => " ",
        }
    }
}

/// Represents a single step in the Zakat calculation process.
///
/// The trace lets a caller show how the final amount was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationStep {
    pub description: String,
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    fn with(operation: Operation, description: impl Into<String>, amount: Option<Decimal>) -> Self {
        Self {
            description: description.into(),
            amount,
            operation,
        }
    }

    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Initial, description, Some(amount))
    }

    pub fn add(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Add, description, Some(amount))
    }

    pub fn compare(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Compare, description, Some(amount))
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self::with(Operation::Rate, description, Some(rate))
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Result, description, Some(amount))
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::with(Operation::Info, description, None)
    }
}

/// Where the monetary nisab used for cash-like assets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum NisabSource {
    /// Gold nisab grams times the average declared gold price.
    GoldAverage,
    /// Silver nisab grams times the average declared silver price.
    SilverAverage,
    /// The configured fallback value.
    Default,
}

impl std::fmt::Display for NisabSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NisabSource::GoldAverage => "gold average price",
            NisabSource::SilverAverage => "silver average price",
            NisabSource::Default => "default value",
        };
        f.write_str(s)
    }
}

/// Per-group subtotal (gold, silver, or cash-like assets).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupBreakdown {
    pub asset_count: usize,
    pub value: Decimal,
    pub zakat: Decimal,
    pub meets_nisab: bool,
}

/// Outcome of running the engine over a ledger snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZakatCalculationResult {
    /// Sum of every asset's value.
    pub total_value: Decimal,
    /// Whether any group reached its threshold.
    pub meets_nisab: bool,
    /// Total zakat due, zero when nothing reached nisab.
    pub zakat_amount: Decimal,
    /// Rate the amount was computed with.
    pub zakat_rate: Decimal,
    pub asset_count: usize,
    /// Monetary threshold applied to cash-like assets.
    pub nisab_value: Decimal,
    pub nisab_source: NisabSource,
    pub gold: GroupBreakdown,
    pub silver: GroupBreakdown,
    /// Cash, stocks and business assets.
    pub other: GroupBreakdown,
    pub calculation_trace: Vec<CalculationStep>,
}

impl ZakatCalculationResult {
    /// The result for a ledger with no assets.
    pub fn empty(nisab_value: Decimal, zakat_rate: Decimal) -> Self {
        Self {
            total_value: Decimal::ZERO,
            meets_nisab: false,
            zakat_amount: Decimal::ZERO,
            zakat_rate,
            asset_count: 0,
            nisab_value,
            nisab_source: NisabSource::Default,
            gold: GroupBreakdown::default(),
            silver: GroupBreakdown::default(),
            other: GroupBreakdown::default(),
            calculation_trace: vec![CalculationStep::info("No assets declared")],
        }
    }

    /// Total value rounded to two decimal places.
    pub fn format_total(&self) -> String {
        format_amount(self.total_value)
    }

    /// Zakat due rounded to two decimal places.
    pub fn format_zakat(&self) -> String {
        format_amount(self.zakat_amount)
    }

    /// Step-by-step explanation of how the zakat amount was derived.
    pub fn explain(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        let _ = writeln!(output, "Zakat calculation over {} asset(s):", self.asset_count);
        let _ = writeln!(output, "{:-<50}", "");

        let width = self
            .calculation_trace
            .iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        for step in &self.calculation_trace {
            match (step.operation, step.amount) {
                (Operation::Info, _) | (_, None) => {
                    let _ = writeln!(output, "  INFO: {}", step.description);
                }
                (Operation::Rate, Some(rate)) => {
                    let _ = writeln!(
                        output,
                        "  {:<width$} : {} {:>10.3}",
                        step.description,
                        step.operation.symbol(),
                        rate,
                        width = width
                    );
                }
                (op, Some(amount)) => {
                    let _ = writeln!(
                        output,
                        "  {:<width$} : {} {:>10}",
                        step.description,
                        op.symbol(),
                        format_amount(amount),
                        width = width
                    );
                }
            }
        }

        let _ = writeln!(output, "{:-<50}", "");
        if self.meets_nisab {
            let _ = writeln!(output, "Status: NISAB MET");
            let _ = writeln!(output, "Amount Due: {}", self.format_zakat());
        } else {
            let _ = writeln!(output, "Status: BELOW NISAB");
        }
        output
    }
}

impl std::fmt::Display for ZakatCalculationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Assets: {} | Total Value: {}", self.asset_count, self.format_total())?;
        writeln!(f, "Nisab: {} ({})", format_amount(self.nisab_value), self.nisab_source)?;
        if self.meets_nisab {
            write!(f, "Status: NISAB MET ({} due)", self.format_zakat())
        } else {
            write!(f, "Status: BELOW NISAB")
        }
    }
}

/// Rounds for display only; amounts are never rounded internally.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_for_display(amount))
}
