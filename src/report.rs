//! Localized views of a calculation, as shown in the result dialog.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assets::{Asset, Holding};
use crate::i18n::{CurrencyFormatter, Translator, ZakatLocale};
use crate::types::ZakatCalculationResult;

/// Text for the nisab banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NisabStatus {
    pub met: bool,
    pub title: String,
    pub description: String,
}

/// Zakat amount block, present only when nisab is met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatDueLine {
    pub label: String,
    pub amount: String,
    pub note: String,
}

/// Everything the result dialog displays, already translated and formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatReport {
    pub locale: ZakatLocale,
    pub title: String,
    pub asset_count_label: String,
    pub asset_count: usize,
    pub total_value_label: String,
    pub total_value: String,
    pub nisab: NisabStatus,
    pub zakat_due: Option<ZakatDueLine>,
}

impl ZakatReport {
    pub fn new(result: &ZakatCalculationResult, locale: ZakatLocale, translator: &Translator) -> Self {
        let t = |key: &str| translator.translate(locale, key, None);

        let nisab = if result.meets_nisab {
            NisabStatus {
                met: true,
                title: t("zakat-result-nisab-met"),
                description: t("zakat-result-nisab-met-desc"),
            }
        } else {
            NisabStatus {
                met: false,
                title: t("zakat-result-nisab-not-met"),
                description: t("zakat-result-nisab-not-met-desc"),
            }
        };

        let zakat_due = result.meets_nisab.then(|| {
            let percent = (result.zakat_rate * dec!(100)).normalize().to_string();
            ZakatDueLine {
                label: t("zakat-result-zakat-amount"),
                amount: locale.format_currency(result.zakat_amount),
                note: translator.translate_with_args(locale, "zakat-result-zakat-note", &[("rate", percent)]),
            }
        });

        ZakatReport {
            locale,
            title: t("zakat-result-title"),
            asset_count_label: t("zakat-result-total-assets"),
            asset_count: result.asset_count,
            total_value_label: t("zakat-result-total-value"),
            total_value: locale.format_currency(result.total_value),
            nisab,
            zakat_due,
        }
    }

    /// Plain-text rendering, one item per line.
    pub fn render(&self) -> String {
        let mut lines = vec![
            self.title.clone(),
            format!("{}: {}", self.asset_count_label, self.asset_count),
            format!("{}: {}", self.total_value_label, self.total_value),
            format!("[{}] {}", if self.nisab.met { "✓" } else { "!" }, self.nisab.title),
            self.nisab.description.clone(),
        ];
        if let Some(due) = &self.zakat_due {
            lines.push(format!("{}: {}", due.label, due.amount));
            lines.push(due.note.clone());
        }
        lines.join("\n")
    }
}

/// One line of the asset list, e.g. `Gold — 100 grams × $60.00 — $6,000.00`.
pub fn describe_asset(asset: &Asset, locale: ZakatLocale, translator: &Translator) -> String {
    let label = translator.asset_kind_label(locale, asset.kind());
    let value = locale.format_currency(asset.value());
    match asset.holding() {
        Holding::PreciousMetal {
            weight_grams,
            price_per_gram,
            ..
        } => format!(
            "{} — {} {} × {} — {}",
            label,
            weight_grams.normalize(),
            translator.translate(locale, "asset-grams", None),
            locale.format_currency(*price_per_gram),
            value
        ),
        Holding::Monetary { .. } => format!("{} — {}", label, value),
    }
}
