//! Session-scoped list of declared assets.

use tracing::{debug, warn};

use crate::assets::{Asset, AssetId, AssetInput};
use crate::inputs::IntoZakatDecimal;
use crate::traits::CalculateZakat;
use crate::types::{Result, ZakatCalculationResult};

/// Ordered, in-memory collection of assets with unique ids.
///
/// Insertion order is kept for display; calculation ignores it.
#[derive(Debug, Clone, Default)]
pub struct AssetLedger {
    assets: Vec<Asset>,
}

impl AssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `input` and appends it as a new asset.
    ///
    /// On error the ledger is left untouched.
    pub fn add_asset(&mut self, input: AssetInput) -> Result<AssetId> {
        let holding = match input.validate() {
            Ok(holding) => holding,
            Err(err) => {
                warn!(kind = %input.kind(), error = %err, "asset rejected");
                return Err(err);
            }
        };

        let mut id = AssetId::new();
        while self.contains(id) {
            id = AssetId::new();
        }

        debug!(%id, kind = %holding.kind(), "asset added");
        self.assets.push(Asset::new(id, holding));
        Ok(id)
    }

    pub fn add_cash(&mut self, value: impl IntoZakatDecimal) -> Result<AssetId> {
        self.add_asset(AssetInput::cash(value))
    }

    pub fn add_stocks(&mut self, value: impl IntoZakatDecimal) -> Result<AssetId> {
        self.add_asset(AssetInput::stocks(value))
    }

    pub fn add_business(&mut self, value: impl IntoZakatDecimal) -> Result<AssetId> {
        self.add_asset(AssetInput::business(value))
    }

    pub fn add_gold(
        &mut self,
        weight: impl IntoZakatDecimal,
        price_per_gram: impl IntoZakatDecimal,
    ) -> Result<AssetId> {
        self.add_asset(AssetInput::gold(weight, price_per_gram))
    }

    pub fn add_silver(
        &mut self,
        weight: impl IntoZakatDecimal,
        price_per_gram: impl IntoZakatDecimal,
    ) -> Result<AssetId> {
        self.add_asset(AssetInput::silver(weight, price_per_gram))
    }

    /// Removes the asset with `id`. Returns `false` if there was none.
    pub fn remove_asset(&mut self, id: AssetId) -> bool {
        let before = self.assets.len();
        self.assets.retain(|asset| asset.id() != id);
        let removed = self.assets.len() != before;
        if removed {
            debug!(%id, "asset removed");
        }
        removed
    }

    /// Owned snapshot of the assets in insertion order.
    pub fn list_assets(&self) -> Vec<Asset> {
        self.assets.clone()
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id() == id)
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn clear(&mut self) {
        self.assets.clear();
    }

    /// Runs `calculator` over the current assets.
    pub fn calculate<C: CalculateZakat + ?Sized>(&self, calculator: &C) -> ZakatCalculationResult {
        calculator.calculate_zakat(&self.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetKind;
    use crate::engine::ZakatEngine;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_keeps_order() {
        let mut ledger = AssetLedger::new();
        let a = ledger.add_cash(100).unwrap();
        let b = ledger.add_gold(10, 60).unwrap();
        let c = ledger.add_business("250.75").unwrap();

        let ids: Vec<_> = ledger.assets().iter().map(|asset| asset.id()).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(ledger.get(b).unwrap().value(), dec!(600));
    }

    #[test]
    fn test_rejected_input_is_no_op() {
        let mut ledger = AssetLedger::new();
        ledger.add_cash(100).unwrap();

        assert!(ledger.add_cash(0).is_err());
        assert!(ledger.add_cash(-5).is_err());
        assert!(ledger.add_gold(0, 60).is_err());
        assert!(ledger.add_silver(10, 0).is_err());
        assert!(ledger.add_asset(AssetInput::new(AssetKind::Stocks)).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_no_op() {
        let mut ledger = AssetLedger::new();
        let id = ledger.add_cash(100).unwrap();

        assert!(!ledger.remove_asset(AssetId::new()));
        assert_eq!(ledger.len(), 1);

        assert!(ledger.remove_asset(id));
        assert!(!ledger.remove_asset(id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ledger = AssetLedger::new();
        ledger.add_cash(100).unwrap();

        let mut snapshot = ledger.list_assets();
        snapshot.clear();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_calculate_through_ledger() {
        let mut ledger = AssetLedger::new();
        ledger.add_gold(100, 60).unwrap();
        let result = ledger.calculate(&ZakatEngine::default());
        assert_eq!(result.zakat_amount, dec!(150));
    }
}
