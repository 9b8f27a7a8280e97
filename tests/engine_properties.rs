use bustani_zakat::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn mixed_ledger() -> AssetLedger {
    let mut ledger = AssetLedger::new();
    ledger.add_gold(90, 62).unwrap();
    ledger.add_gold(20, 58).unwrap();
    ledger.add_silver(700, dec!(0.85)).unwrap();
    ledger.add_cash("3200.40").unwrap();
    ledger.add_stocks(1500).unwrap();
    ledger.add_business(900).unwrap();
    ledger
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn single_cash(value: impl IntoZakatDecimal) -> Vec<Asset> {
    let mut ledger = AssetLedger::new();
    ledger.add_cash(value).unwrap();
    ledger.list_assets()
}

#[test]
fn test_empty_ledger_is_all_zero() {
    let ledger = AssetLedger::new();
    let result = ledger.calculate(&ZakatEngine::default());
    assert_eq!(result.total_value, Decimal::ZERO);
    assert_eq!(result.zakat_amount, Decimal::ZERO);
    assert!(!result.meets_nisab);
}

#[test]
fn test_single_cash_thresholds() {
    let below = calculate(&single_cash("4999.99"));
    assert!(!below.meets_nisab);
    assert_eq!(below.zakat_amount, Decimal::ZERO);

    let above = calculate(&single_cash(8000));
    assert!(above.meets_nisab);
    assert_eq!(above.zakat_amount, dec!(8000) * dec!(0.025));
}

#[test]
fn test_gold_worked_values() {
    let mut ledger = AssetLedger::new();
    ledger.add_gold(100, 60).unwrap();
    let result = calculate(ledger.assets());
    assert_eq!(result.total_value, dec!(6000));
    assert_eq!(result.zakat_amount, dec!(150));
    assert!(result.meets_nisab);

    let mut ledger = AssetLedger::new();
    ledger.add_gold(50, 60).unwrap();
    let result = calculate(ledger.assets());
    assert_eq!(result.total_value, dec!(3000));
    assert_eq!(result.zakat_amount, Decimal::ZERO);
    assert!(!result.meets_nisab);
}

#[test]
fn test_mixed_ledger_breakdown() {
    let ledger = mixed_ledger();
    let result = calculate(ledger.assets());

    // Gold: 90g x 62 = 5580 qualifies, 20g x 58 = 1160 does not.
    assert_eq!(result.gold.value, dec!(6740));
    assert_eq!(result.gold.zakat, dec!(139.5));
    // Silver: 700g x 0.85 = 595 qualifies.
    assert_eq!(result.silver.zakat, dec!(14.875));
    // Nisab from the gold average price: 85 x 60 = 5100; 5600.40 reaches it.
    assert_eq!(result.nisab_source, NisabSource::GoldAverage);
    assert_eq!(result.nisab_value, dec!(5100));
    assert_eq!(result.other.value, dec!(5600.40));
    assert_eq!(result.other.zakat, dec!(140.01));

    assert_eq!(result.total_value, dec!(12935.40));
    assert_eq!(result.zakat_amount, dec!(294.385));
    assert_eq!(result.format_zakat(), "294.39");
}

#[test]
fn test_calculation_is_idempotent() {
    let ledger = mixed_ledger();
    let engine = ZakatEngine::default();
    let first = ledger.calculate(&engine);
    let second = ledger.calculate(&engine);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_calculation_ignores_order() {
    let assets = mixed_ledger().list_assets();
    let expected = calculate(&assets);

    let mut reversed = assets.clone();
    reversed.reverse();
    assert_eq!(calculate(&reversed), expected);

    let mut rotated = assets.clone();
    rotated.rotate_left(2);
    assert_eq!(calculate(&rotated), expected);
}

#[test]
fn test_summed_policy_joins_small_holdings() {
    let mut ledger = AssetLedger::new();
    ledger.add_silver(300, 1).unwrap();
    ledger.add_silver(300, 1).unwrap();

    let per_asset = ledger.calculate(&ZakatEngine::default());
    assert!(!per_asset.meets_nisab);

    let summed = ledger.calculate(&ZakatEngine::new(
        ZakatConfig::default().with_aggregation(AggregationPolicy::Summed),
    ));
    assert!(summed.meets_nisab);
    assert_eq!(summed.zakat_amount, dec!(15));
}

#[test]
fn test_deserialized_asset_is_not_trusted() {
    init_tracing();
    // A shell might reload assets from its own storage without validation.
    let json = r#"{
        "id": "6f1c1d4e-7a0b-4d35-9a4e-2c8f1b7f6a11",
        "holding": { "type": "preciousMetal", "metal": "gold", "weightGrams": "-5", "pricePerGram": "0" }
    }"#;
    let asset: Asset = serde_json::from_str(json).unwrap();
    let result = calculate(&[asset]);
    assert_eq!(result.zakat_amount, Decimal::ZERO);
    assert!(!result.meets_nisab);
    assert_eq!(result.nisab_source, NisabSource::Default);
}

#[test]
fn test_overflowing_sums_ignore_order() {
    init_tracing();
    let mut ledger = AssetLedger::new();
    ledger.add_cash(10000).unwrap();
    ledger.add_cash(Decimal::MAX).unwrap();
    ledger.add_cash(Decimal::MAX).unwrap();
    let assets = ledger.list_assets();

    let expected = calculate(&assets);
    assert_eq!(expected.asset_count, 3);
    // Terms are summed smallest first; each maximal value no longer fits.
    assert_eq!(expected.total_value, dec!(10000));
    assert_eq!(expected.zakat_amount, dec!(250));

    let mut reversed = assets.clone();
    reversed.reverse();
    assert_eq!(calculate(&reversed), expected);

    let mut rotated = assets.clone();
    rotated.rotate_left(1);
    assert_eq!(calculate(&rotated), expected);
}

#[test]
fn test_overflowing_metal_sums_ignore_order() {
    let mut ledger = AssetLedger::new();
    ledger.add_gold(Decimal::MAX, 1).unwrap();
    ledger.add_gold(Decimal::MAX, 1).unwrap();
    ledger.add_gold(100, 60).unwrap();
    let assets = ledger.list_assets();

    let engine = ZakatEngine::new(ZakatConfig::default().with_aggregation(AggregationPolicy::Summed));
    let expected = ledger.calculate(&engine);
    assert!(expected.gold.meets_nisab);

    let mut reversed = assets.clone();
    reversed.reverse();
    assert_eq!(engine.calculate(&reversed), expected);
    assert_eq!(calculate(&reversed), calculate(&assets));
}
