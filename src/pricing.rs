//! Market prices for precious metals.
//!
//! The engine derives a nisab from the prices users declare with their gold
//! and silver; when none are declared it falls back to
//! [`ZakatConfig::default_nisab_value`](crate::config::ZakatConfig). A
//! [`PriceProvider`] lets a caller replace that fallback with a live quote.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inputs::{decimal_field, IntoZakatDecimal};
use crate::types::{Result, ValidationError, ValidationReason};

/// Current market prices per gram in local currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prices {
    pub gold_per_gram: Decimal,
    pub silver_per_gram: Decimal,
}

impl Prices {
    pub fn new(
        gold_per_gram: impl IntoZakatDecimal,
        silver_per_gram: impl IntoZakatDecimal,
    ) -> Result<Self> {
        let gold = decimal_field("goldPerGram", gold_per_gram)?;
        let silver = decimal_field("silverPerGram", silver_per_gram)?;

        for (field, price) in [("goldPerGram", gold), ("silverPerGram", silver)] {
            if price < Decimal::ZERO {
                return Err(ValidationError::new(field, ValidationReason::Negative)
                    .with_value(price)
                    .into());
            }
        }

        Ok(Self {
            gold_per_gram: gold,
            silver_per_gram: silver,
        })
    }
}

/// Source of current metal prices (REST API, cache, fixed values...).
///
/// # Example
/// ```ignore
/// use bustani_zakat::pricing::{PriceProvider, StaticPriceProvider};
///
/// let provider = StaticPriceProvider::new(65, 0.85)?;
/// let prices = provider.get_prices().await?;
/// ```
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    async fn get_prices(&self) -> Result<Prices>;
}

/// A provider returning fixed prices, for tests and offline use.
#[derive(Debug, Clone)]
pub struct StaticPriceProvider {
    prices: Prices,
}

impl StaticPriceProvider {
    pub fn new(
        gold_per_gram: impl IntoZakatDecimal,
        silver_per_gram: impl IntoZakatDecimal,
    ) -> Result<Self> {
        Ok(Self {
            prices: Prices::new(gold_per_gram, silver_per_gram)?,
        })
    }

    pub fn from_prices(prices: Prices) -> Self {
        Self { prices }
    }

    pub fn prices(&self) -> &Prices {
        &self.prices
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl PriceProvider for StaticPriceProvider {
    async fn get_prices(&self) -> Result<Prices> {
        Ok(self.prices.clone())
    }
}
