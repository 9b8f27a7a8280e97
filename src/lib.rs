//! Zakat calculator for the Bustani charity website.
//!
//! Users declare holdings one at a time in an [`AssetLedger`]; the
//! [`ZakatEngine`] then works out the total value, whether any nisab is
//! reached and how much zakat is due.
//!
//! ```rust
//! use bustani_zakat::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = AssetLedger::new();
//! ledger.add_gold(100, 60).unwrap();
//! ledger.add_cash(1200).unwrap();
//!
//! let result = ledger.calculate(&ZakatEngine::default());
//! assert!(result.meets_nisab);
//! assert_eq!(result.zakat_amount, dec!(150));
//! ```

pub mod assets;
pub mod config;
pub mod donation;
pub mod engine;
pub mod i18n;
pub mod inputs;
pub mod ledger;
pub mod prelude;
pub mod pricing;
pub mod report;
pub mod traits;
pub mod types;

pub use assets::{Asset, AssetId, AssetInput, AssetKind};
pub use config::{AggregationPolicy, ZakatConfig};
pub use engine::{calculate, ZakatEngine};
pub use ledger::AssetLedger;
pub use traits::CalculateZakat;
pub use types::{ZakatCalculationResult, ZakatError};
