//! Donation intents handed to the payment flow.
//!
//! Nothing here moves money; an intent only records what the user chose to
//! give so the caller can forward it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inputs::{decimal_field, IntoZakatDecimal};
use crate::types::{Result, ValidationError, ValidationReason, ZakatCalculationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DonationSource {
    /// Amount produced by the calculator.
    Calculated,
    /// Amount typed in by the user.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationIntent {
    pub amount: Decimal,
    pub source: DonationSource,
}

impl DonationIntent {
    /// Intent for a calculated result; `None` when nothing is due.
    pub fn from_result(result: &ZakatCalculationResult) -> Option<Self> {
        if !result.meets_nisab || result.zakat_amount <= Decimal::ZERO {
            return None;
        }
        debug!(amount = %result.zakat_amount, "calculated zakat donation prepared");
        Some(Self {
            amount: result.zakat_amount,
            source: DonationSource::Calculated,
        })
    }

    /// Intent for an amount entered by hand. Must be greater than zero.
    pub fn manual(amount: impl IntoZakatDecimal) -> Result<Self> {
        let amount = decimal_field("amount", amount)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::new("amount", ValidationReason::NotPositive)
                .with_value(amount)
                .into());
        }
        debug!(%amount, "manual zakat donation prepared");
        Ok(Self {
            amount,
            source: DonationSource::Manual,
        })
    }
}

impl ZakatCalculationResult {
    /// Shortcut for [`DonationIntent::from_result`].
    pub fn donation_intent(&self) -> Option<DonationIntent> {
        DonationIntent::from_result(self)
    }
}
