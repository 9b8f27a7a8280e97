use bustani_zakat::i18n::default_translator;
use bustani_zakat::prelude::*;
use bustani_zakat::report::describe_asset;

fn gold_and_cash() -> AssetLedger {
    let mut ledger = AssetLedger::new();
    ledger.add_gold(100, 60).unwrap();
    ledger.add_cash(1200).unwrap();
    ledger
}

#[test]
fn test_english_report() {
    let ledger = gold_and_cash();
    let result = ledger.calculate(&ZakatEngine::default());
    let report = ZakatReport::new(&result, ZakatLocale::EnUS, default_translator());

    assert_eq!(report.asset_count, 2);
    assert_eq!(report.total_value, "$7,200.00");
    assert!(report.nisab.met);

    let text = report.render();
    assert!(text.contains("Nisab reached"));
    assert!(text.contains("$150.00"));
    assert!(!text.contains("MISSING:"));
}

#[test]
fn test_arabic_report_is_fully_translated() {
    let ledger = gold_and_cash();
    let result = ledger.calculate(&ZakatEngine::default());
    let report = ZakatReport::new(&result, ZakatLocale::ArSA, default_translator());

    assert!(ZakatLocale::ArSA.is_rtl());
    assert!(report.total_value.ends_with("US$"));
    let text = report.render();
    assert!(!text.contains("MISSING:"));
    assert!(!text.contains("Nisab reached"));
}

#[test]
fn test_report_below_nisab_has_no_amount() {
    let mut ledger = AssetLedger::new();
    ledger.add_silver(100, 1).unwrap();
    let result = ledger.calculate(&ZakatEngine::default());

    for locale in ZakatLocale::ALL {
        let report = ZakatReport::new(&result, locale, default_translator());
        assert!(!report.nisab.met);
        assert!(report.zakat_due.is_none());
    }
}

#[test]
fn test_report_serializes_for_frontend() {
    let result = gold_and_cash().calculate(&ZakatEngine::default());
    let report = ZakatReport::new(&result, ZakatLocale::EnUS, default_translator());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["assetCount"], 2);
    assert_eq!(json["nisab"]["met"], true);
    assert!(json["zakatDue"]["amount"].is_string());
}

#[test]
fn test_asset_lines() {
    let ledger = gold_and_cash();
    let assets = ledger.list_assets();
    let t = default_translator();

    assert_eq!(
        describe_asset(&assets[1], ZakatLocale::EnUS, t),
        "Cash — $1,200.00"
    );
    let ar = describe_asset(&assets[0], ZakatLocale::ArSA, t);
    assert!(ar.contains("US$"));
    assert!(!ar.contains("MISSING:"));
}

#[test]
fn test_form_errors_are_localized() {
    let mut ledger = AssetLedger::new();
    let err = ledger.add_gold(0, 60).unwrap_err();
    let t = default_translator();

    assert_eq!(
        t.localize_error(ZakatLocale::EnUS, &err),
        "Weight must be greater than zero."
    );
    let ar = t.localize_error(ZakatLocale::ArSA, &err);
    assert!(!ar.is_empty());
    assert!(!ar.contains("MISSING:"));
}
