//! Prelude module for the calculator.
//!
//! Re-exports the types most callers need.
//!
//! ```rust
//! use bustani_zakat::prelude::*;
//! ```

pub use crate::assets::{Asset, AssetId, AssetInput, AssetKind, Holding, Metal, MonetaryKind};
pub use crate::config::{AggregationPolicy, ZakatConfig};
pub use crate::donation::{DonationIntent, DonationSource};
pub use crate::engine::{calculate, ZakatEngine};
pub use crate::i18n::{CurrencyFormatter, Translator, ZakatLocale};
pub use crate::inputs::IntoZakatDecimal;
pub use crate::ledger::AssetLedger;
pub use crate::pricing::{Prices, StaticPriceProvider};
#[cfg(feature = "async")]
pub use crate::pricing::PriceProvider;
pub use crate::report::ZakatReport;
pub use crate::traits::CalculateZakat;
pub use crate::types::{
    CalculationStep, GroupBreakdown, NisabSource, ValidationError, ValidationReason,
    ZakatCalculationResult, ZakatError,
};
