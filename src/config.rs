use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use strum::{Display, EnumString};
use tracing::debug;

use crate::inputs::IntoZakatDecimal;
use crate::pricing::Prices;
use crate::types::{Result, ZakatError};

pub const ZAKAT_RATE: Decimal = dec!(0.025);
pub const GOLD_NISAB_GRAMS: Decimal = dec!(85);
pub const SILVER_NISAB_GRAMS: Decimal = dec!(595);
/// Monetary nisab used when no precious-metal price is known.
pub const DEFAULT_NISAB_VALUE: Decimal = dec!(5000);

/// How gold and silver holdings are tested against their weight threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
    Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AggregationPolicy {
    /// Each holding is compared against the threshold on its own.
    #[default]
    PerAsset,
    /// All holdings of a metal are weighed together.
    Summed,
}

/// Engine parameters. `Default` gives the standard constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ZakatConfig {
    pub zakat_rate: Decimal,
    pub gold_nisab_grams: Decimal,
    pub silver_nisab_grams: Decimal,
    pub default_nisab_value: Decimal,
    pub aggregation: AggregationPolicy,
}

impl Default for ZakatConfig {
    fn default() -> Self {
        ZakatConfig {
            zakat_rate: ZAKAT_RATE,
            gold_nisab_grams: GOLD_NISAB_GRAMS,
            silver_nisab_grams: SILVER_NISAB_GRAMS,
            default_nisab_value: DEFAULT_NISAB_VALUE,
            aggregation: AggregationPolicy::PerAsset,
        }
    }
}

impl std::str::FromStr for ZakatConfig {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: ZakatConfig = serde_json::from_str(s)
            .map_err(|e| ZakatError::Configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl ZakatConfig {
    pub fn builder() -> ZakatConfigBuilder {
        ZakatConfigBuilder::default()
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.zakat_rate <= Decimal::ZERO || self.zakat_rate > Decimal::ONE {
            return Err(ZakatError::Configuration(format!(
                "Zakat rate must be in (0, 1], got {}",
                self.zakat_rate
            )));
        }
        if self.gold_nisab_grams <= Decimal::ZERO {
            return Err(ZakatError::Configuration("Gold nisab grams must be > 0".to_string()));
        }
        if self.silver_nisab_grams <= Decimal::ZERO {
            return Err(ZakatError::Configuration("Silver nisab grams must be > 0".to_string()));
        }
        if self.default_nisab_value <= Decimal::ZERO {
            return Err(ZakatError::Configuration("Default nisab value must be > 0".to_string()));
        }
        Ok(())
    }

    /// Loads overrides from `ZAKAT_*` environment variables on top of the defaults.
    ///
    /// Recognised: `ZAKAT_RATE`, `ZAKAT_GOLD_NISAB_GRAMS`, `ZAKAT_SILVER_NISAB_GRAMS`,
    /// `ZAKAT_DEFAULT_NISAB`, `ZAKAT_AGGREGATION` (`per-asset` or `summed`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ZakatConfig::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let decimal = |key: &str| -> Result<Option<Decimal>> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<Decimal>()
                        .map_err(|e| ZakatError::Configuration(format!("Invalid {} '{}': {}", key, raw, e)))
                })
                .transpose()
        };

        if let Some(v) = decimal("ZAKAT_RATE")? {
            config.zakat_rate = v;
        }
        if let Some(v) = decimal("ZAKAT_GOLD_NISAB_GRAMS")? {
            config.gold_nisab_grams = v;
        }
        if let Some(v) = decimal("ZAKAT_SILVER_NISAB_GRAMS")? {
            config.silver_nisab_grams = v;
        }
        if let Some(v) = decimal("ZAKAT_DEFAULT_NISAB")? {
            config.default_nisab_value = v;
        }
        if let Some(raw) = lookup("ZAKAT_AGGREGATION") {
            config.aggregation = raw.trim().parse().map_err(|_| {
                ZakatError::Configuration(format!("Invalid ZAKAT_AGGREGATION '{}'", raw))
            })?;
        }

        config.validate()?;
        debug!(?config, "loaded zakat configuration from environment");
        Ok(config)
    }

    /// Attempts to load configuration from a JSON file.
    pub fn try_from_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ZakatError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        content.parse()
    }

    /// Replaces the fallback nisab with one derived from market prices.
    ///
    /// Gold is preferred; silver is used when gold is unpriced. With neither
    /// priced the configuration is returned unchanged.
    pub fn with_market_prices(mut self, prices: &Prices) -> Self {
        let derived = if prices.gold_per_gram > Decimal::ZERO {
            self.gold_nisab_grams.checked_mul(prices.gold_per_gram)
        } else if prices.silver_per_gram > Decimal::ZERO {
            self.silver_nisab_grams.checked_mul(prices.silver_per_gram)
        } else {
            None
        };
        if let Some(value) = derived {
            debug!(%value, "default nisab derived from market prices");
            self.default_nisab_value = value;
        }
        self
    }

    /// Builds a configuration whose fallback nisab comes from a price provider.
    #[cfg(feature = "async")]
    pub async fn from_provider<P: crate::pricing::PriceProvider + ?Sized>(
        provider: &P,
    ) -> Result<Self> {
        let prices = provider.get_prices().await?;
        let config = Self::default().with_market_prices(&prices);
        config.validate()?;
        Ok(config)
    }

    /// Refreshes the fallback nisab from the given provider.
    #[cfg(feature = "async")]
    pub async fn refresh_prices<P: crate::pricing::PriceProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Result<()> {
        let prices = provider.get_prices().await?;
        let refreshed = self.clone().with_market_prices(&prices);
        refreshed.validate()?;
        *self = refreshed;
        Ok(())
    }

    pub fn with_aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = aggregation;
        self
    }
}

// ========== ZakatConfigBuilder ==========

#[derive(Debug, Default)]
pub struct ZakatConfigBuilder {
    zakat_rate: Option<Decimal>,
    gold_nisab_grams: Option<Decimal>,
    silver_nisab_grams: Option<Decimal>,
    default_nisab_value: Option<Decimal>,
    aggregation: Option<AggregationPolicy>,
    error: Option<ZakatError>,
}

impl ZakatConfigBuilder {
    fn set(&mut self, val: impl IntoZakatDecimal) -> Option<Decimal> {
        match val.into_zakat_decimal() {
            Ok(v) => Some(v),
            Err(e) => {
                self.error.get_or_insert(e);
                None
            }
        }
    }

    pub fn zakat_rate(mut self, rate: impl IntoZakatDecimal) -> Self {
        self.zakat_rate = self.set(rate);
        self
    }

    pub fn gold_nisab_grams(mut self, grams: impl IntoZakatDecimal) -> Self {
        self.gold_nisab_grams = self.set(grams);
        self
    }

    pub fn silver_nisab_grams(mut self, grams: impl IntoZakatDecimal) -> Self {
        self.silver_nisab_grams = self.set(grams);
        self
    }

    pub fn default_nisab_value(mut self, value: impl IntoZakatDecimal) -> Self {
        self.default_nisab_value = self.set(value);
        self
    }

    pub fn aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn build(self) -> Result<ZakatConfig> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let defaults = ZakatConfig::default();
        let config = ZakatConfig {
            zakat_rate: self.zakat_rate.unwrap_or(defaults.zakat_rate),
            gold_nisab_grams: self.gold_nisab_grams.unwrap_or(defaults.gold_nisab_grams),
            silver_nisab_grams: self.silver_nisab_grams.unwrap_or(defaults.silver_nisab_grams),
            default_nisab_value: self.default_nisab_value.unwrap_or(defaults.default_nisab_value),
            aggregation: self.aggregation.unwrap_or(defaults.aggregation),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = ZakatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.zakat_rate, dec!(0.025));
        assert_eq!(config.default_nisab_value, dec!(5000));
    }

    #[test]
    fn test_builder_validation() {
        let config = ZakatConfig::builder()
            .default_nisab_value(7000)
            .aggregation(AggregationPolicy::Summed)
            .build()
            .unwrap();
        assert_eq!(config.default_nisab_value, dec!(7000));
        assert_eq!(config.gold_nisab_grams, dec!(85));

        assert!(ZakatConfig::builder().zakat_rate(0).build().is_err());
        assert!(ZakatConfig::builder().zakat_rate(1.5).build().is_err());
        assert!(ZakatConfig::builder().gold_nisab_grams("x").build().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("ZAKAT_DEFAULT_NISAB", "6200.50"),
            ("ZAKAT_AGGREGATION", "summed"),
        ]
        .into_iter()
        .collect();
        let config = ZakatConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.default_nisab_value, dec!(6200.50));
        assert_eq!(config.aggregation, AggregationPolicy::Summed);
        assert_eq!(config.silver_nisab_grams, dec!(595));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let res = ZakatConfig::from_lookup(|k| (k == "ZAKAT_RATE").then(|| "abc".to_string()));
        assert!(matches!(res, Err(ZakatError::Configuration(_))));

        let res = ZakatConfig::from_lookup(|k| (k == "ZAKAT_AGGREGATION").then(|| "pooled".to_string()));
        assert!(res.is_err());
    }

    #[test]
    fn test_market_prices_replace_default() {
        let prices = Prices::new(60, 1).unwrap();
        let config = ZakatConfig::default().with_market_prices(&prices);
        assert_eq!(config.default_nisab_value, dec!(5100));

        let silver_only = Prices::new(0, dec!(0.9)).unwrap();
        let config = ZakatConfig::default().with_market_prices(&silver_only);
        assert_eq!(config.default_nisab_value, dec!(535.5));

        let none = Prices::new(0, 0).unwrap();
        let config = ZakatConfig::default().with_market_prices(&none);
        assert_eq!(config.default_nisab_value, DEFAULT_NISAB_VALUE);
    }
}
