//! The zakat calculation engine.
//!
//! Assets are split into gold, silver and cash-like groups. Gold and silver
//! are tested against their weight thresholds (85 g / 595 g by default),
//! either one holding at a time or per metal depending on
//! [`AggregationPolicy`]. Cash-like assets are tested together against a
//! monetary nisab taken from the average declared gold price when any gold
//! is declared, else from the average silver price when silver is declared.
//! A missing or non-positive average leaves the configured fallback.
//!
//! Every sum is checked and taken over its terms in ascending order. A term
//! that would overflow is left out of its sum and logged; the engine never
//! fails and never panics, and the order of the assets never matters.

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::assets::{Asset, Holding, Metal};
use crate::config::{AggregationPolicy, ZakatConfig};
use crate::traits::CalculateZakat;
use crate::types::{CalculationStep, GroupBreakdown, NisabSource, ZakatCalculationResult};

#[derive(Debug, Clone, Default)]
pub struct ZakatEngine {
    config: ZakatConfig,
}

/// Calculates with the default configuration.
pub fn calculate(assets: &[Asset]) -> ZakatCalculationResult {
    ZakatEngine::default().calculate(assets)
}

/// Sums `terms` in ascending order, skipping any term that would overflow.
///
/// Sorting first makes the result depend only on the multiset of terms, so
/// reordering assets cannot change which term is skipped.
fn ordered_sum(mut terms: Vec<Decimal>, what: &str) -> Decimal {
    terms.sort_unstable();
    terms.into_iter().fold(Decimal::ZERO, |acc, term| match acc.checked_add(term) {
        Some(sum) => sum,
        None => {
            warn!(%term, what, "excluding term that overflows the sum");
            acc
        }
    })
}

/// Terms collected for one metal before summing.
#[derive(Debug, Default)]
struct MetalTally {
    count: usize,
    values: Vec<Decimal>,
    weights: Vec<Decimal>,
    prices: Vec<Decimal>,
    /// Values of holdings that individually reach the threshold.
    qualifying_values: Vec<Decimal>,
    any_qualifying: bool,
}

/// Summed view of a [`MetalTally`].
#[derive(Debug)]
struct MetalGroup {
    count: usize,
    value: Decimal,
    average_price: Option<Decimal>,
    zakatable: Decimal,
    meets_nisab: bool,
}

impl MetalTally {
    fn record(&mut self, asset: &Asset, weight: Decimal, price: Decimal, threshold: Decimal) {
        self.count += 1;
        let value = asset.checked_value();
        match value {
            Some(v) => self.values.push(v),
            None => warn!(asset = %asset.id(), "excluding metal value that overflows"),
        }
        self.weights.push(weight);
        self.prices.push(price);

        if weight >= threshold {
            self.any_qualifying = true;
            if let Some(v) = value {
                self.qualifying_values.push(v);
            }
        }
    }

    fn finish(self, policy: AggregationPolicy, threshold: Decimal) -> MetalGroup {
        let value = ordered_sum(self.values, "metal value");
        let average_price = if self.count == 0 {
            None
        } else {
            ordered_sum(self.prices, "metal price").checked_div(Decimal::from(self.count))
        };

        let (zakatable, meets_nisab) = match policy {
            AggregationPolicy::PerAsset => (
                ordered_sum(self.qualifying_values, "qualifying metal value"),
                self.any_qualifying,
            ),
            AggregationPolicy::Summed => {
                let weight = ordered_sum(self.weights, "metal weight");
                if self.count > 0 && weight >= threshold {
                    (value, true)
                } else {
                    (Decimal::ZERO, false)
                }
            }
        };

        MetalGroup {
            count: self.count,
            value,
            average_price,
            zakatable,
            meets_nisab,
        }
    }
}

impl ZakatEngine {
    pub fn new(config: ZakatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ZakatConfig {
        &self.config
    }

    /// Computes total value, nisab status and zakat due for `assets`.
    pub fn calculate(&self, assets: &[Asset]) -> ZakatCalculationResult {
        if assets.is_empty() {
            debug!("no assets declared, nothing to calculate");
            return ZakatCalculationResult::empty(self.config.default_nisab_value, self.config.zakat_rate);
        }

        let cfg = &self.config;
        let mut gold = MetalTally::default();
        let mut silver = MetalTally::default();
        let mut other_values = Vec::new();
        let mut other_count = 0usize;
        let mut asset_values = Vec::with_capacity(assets.len());

        for asset in assets {
            match asset.checked_value() {
                Some(v) => asset_values.push(v),
                None => warn!(asset = %asset.id(), "excluding asset from total value"),
            }

            match asset.holding() {
                Holding::PreciousMetal {
                    metal: Metal::Gold,
                    weight_grams,
                    price_per_gram,
                } => gold.record(asset, *weight_grams, *price_per_gram, cfg.gold_nisab_grams),
                Holding::PreciousMetal {
                    metal: Metal::Silver,
                    weight_grams,
                    price_per_gram,
                } => silver.record(asset, *weight_grams, *price_per_gram, cfg.silver_nisab_grams),
                Holding::Monetary { value, .. } => {
                    other_count += 1;
                    other_values.push(*value);
                }
            }
        }

        let total_value = ordered_sum(asset_values, "total value");
        let other_value = ordered_sum(other_values, "cash-like value");
        let gold = gold.finish(cfg.aggregation, cfg.gold_nisab_grams);
        let silver = silver.finish(cfg.aggregation, cfg.silver_nisab_grams);

        let mut trace = vec![CalculationStep::initial("Total Value", total_value)];

        let gold_meets = gold.meets_nisab;
        let silver_meets = silver.meets_nisab;
        let gold_zakat = self.apply_rate(gold.zakatable);
        let silver_zakat = self.apply_rate(silver.zakatable);

        for (name, group, threshold, meets, zakat) in [
            ("Gold", &gold, cfg.gold_nisab_grams, gold_meets, gold_zakat),
            ("Silver", &silver, cfg.silver_nisab_grams, silver_meets, silver_zakat),
        ] {
            if group.count == 0 {
                continue;
            }
            trace.push(CalculationStep::add(format!("{} Holdings Value", name), group.value));
            trace.push(CalculationStep::compare(format!("{} Nisab (grams)", name), threshold));
            if meets {
                trace.push(CalculationStep::rate("Applied Rate", cfg.zakat_rate));
            } else {
                trace.push(CalculationStep::info(format!("{} below nisab - no zakat", name)));
            }
            trace.push(CalculationStep::result(format!("{} Zakat", name), zakat));
        }

        let (nisab_value, nisab_source) = self.resolve_nisab(&gold, &silver);
        trace!(%nisab_value, %nisab_source, "resolved monetary nisab");

        let other_meets = other_value >= nisab_value && other_value > Decimal::ZERO;
        let other_zakat = if other_meets {
            self.apply_rate(other_value)
        } else {
            Decimal::ZERO
        };

        trace.push(CalculationStep::add("Cash, Stocks and Business", other_value));
        trace.push(CalculationStep::compare(
            format!("Nisab Value ({})", nisab_source),
            nisab_value,
        ));
        if other_meets {
            trace.push(CalculationStep::rate("Applied Rate", cfg.zakat_rate));
        } else if other_count > 0 {
            trace.push(CalculationStep::info("Cash-like assets below nisab - no zakat"));
        }
        trace.push(CalculationStep::result("Cash-like Zakat", other_zakat));

        let zakat_amount = ordered_sum(vec![gold_zakat, silver_zakat, other_zakat], "zakat due");
        let meets_nisab = other_meets || gold_meets || silver_meets;

        trace.push(CalculationStep::result("Zakat Due", zakat_amount));

        debug!(
            assets = assets.len(),
            %total_value,
            %zakat_amount,
            meets_nisab,
            "zakat calculated"
        );

        ZakatCalculationResult {
            total_value,
            meets_nisab,
            zakat_amount,
            zakat_rate: cfg.zakat_rate,
            asset_count: assets.len(),
            nisab_value,
            nisab_source,
            gold: GroupBreakdown {
                asset_count: gold.count,
                value: gold.value,
                zakat: gold_zakat,
                meets_nisab: gold_meets,
            },
            silver: GroupBreakdown {
                asset_count: silver.count,
                value: silver.value,
                zakat: silver_zakat,
                meets_nisab: silver_meets,
            },
            other: GroupBreakdown {
                asset_count: other_count,
                value: other_value,
                zakat: other_zakat,
                meets_nisab: other_meets,
            },
            calculation_trace: trace,
        }
    }

    fn apply_rate(&self, amount: Decimal) -> Decimal {
        amount.checked_mul(self.config.zakat_rate).unwrap_or_else(|| {
            warn!(%amount, "zakat on amount overflows, excluded");
            Decimal::ZERO
        })
    }

    // Gold decides whenever gold is declared; silver only without gold.
    // A non-positive average keeps the configured fallback.
    fn resolve_nisab(&self, gold: &MetalGroup, silver: &MetalGroup) -> (Decimal, NisabSource) {
        let (group, grams, source) = if gold.count > 0 {
            (gold, self.config.gold_nisab_grams, NisabSource::GoldAverage)
        } else if silver.count > 0 {
            (silver, self.config.silver_nisab_grams, NisabSource::SilverAverage)
        } else {
            return (self.config.default_nisab_value, NisabSource::Default);
        };

        let nisab = group
            .average_price
            .filter(|avg| *avg > Decimal::ZERO)
            .and_then(|avg| grams.checked_mul(avg));
        match nisab {
            Some(value) => (value, source),
            None => {
                trace!(%source, "no usable average price, keeping default nisab");
                (self.config.default_nisab_value, NisabSource::Default)
            }
        }
    }
}

impl CalculateZakat for ZakatEngine {
    fn calculate_zakat(&self, assets: &[Asset]) -> ZakatCalculationResult {
        self.calculate(assets)
    }
}
