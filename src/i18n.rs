use fixed_decimal::FixedDecimal;
use fluent_bundle::bundle::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use icu::decimal::{options::FixedDecimalFormatterOptions, FixedDecimalFormatter};
use icu::locid::{locale, Locale};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;
use unic_langid::LanguageIdentifier;
use writeable::Writeable;

use crate::assets::AssetKind;
use crate::types::{format_amount, ValidationReason, ZakatError};

#[derive(RustEmbed)]
#[folder = "assets/locales"]
struct Locales;

type Bundle = FluentBundle<FluentResource, intl_memoizer::concurrent::IntlLangMemoizer>;

/// Languages the calculator is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum ZakatLocale {
    #[default]
    EnUS,
    ArSA,
}

impl ZakatLocale {
    pub const ALL: [ZakatLocale; 2] = [ZakatLocale::EnUS, ZakatLocale::ArSA];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZakatLocale::EnUS => "en-US",
            ZakatLocale::ArSA => "ar-SA",
        }
    }

    pub fn to_icu_locale(&self) -> Locale {
        match self {
            ZakatLocale::EnUS => locale!("en-US"),
            ZakatLocale::ArSA => locale!("ar-SA"),
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, ZakatLocale::ArSA)
    }
}

impl FromStr for ZakatLocale {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-US" | "en" => Ok(ZakatLocale::EnUS),
            "ar-SA" | "ar" => Ok(ZakatLocale::ArSA),
            _ => Err(format!("Unsupported locale: {}", s)),
        }
    }
}

/// Locale-aware money formatting.
pub trait CurrencyFormatter {
    fn format_currency(&self, amount: Decimal) -> String;
}

impl CurrencyFormatter for ZakatLocale {
    /// Two-decimal amount with locale digits and grouping. Amounts on the
    /// site are in US dollars whatever the language.
    fn format_currency(&self, amount: Decimal) -> String {
        let plain = format_amount(amount);
        let options = FixedDecimalFormatterOptions::default();

        let number = match (
            FixedDecimalFormatter::try_new(&self.to_icu_locale().into(), options),
            FixedDecimal::from_str(&plain),
        ) {
            (Ok(formatter), Ok(fixed)) => formatter.format(&fixed).write_to_string().into_owned(),
            _ => {
                warn!(locale = self.as_str(), "ICU formatting unavailable, using plain amount");
                plain
            }
        };

        match self {
            ZakatLocale::EnUS => format!("${}", number),
            ZakatLocale::ArSA => format!("{} US$", number),
        }
    }
}

/// Fluent-backed message lookup for every [`ZakatLocale`].
#[derive(Clone)]
pub struct Translator {
    bundles: Arc<HashMap<ZakatLocale, Bundle>>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("locales", &self.bundles.keys())
            .finish()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        let mut bundles = HashMap::new();

        for locale in ZakatLocale::ALL {
            let code = locale.as_str();
            let lang_id: LanguageIdentifier = match code.parse() {
                Ok(id) => id,
                Err(e) => {
                    warn!(code, error = %e, "invalid language identifier");
                    continue;
                }
            };
            let mut bundle: Bundle = FluentBundle::new_concurrent(vec![lang_id]);
            bundle.set_use_isolating(false);

            let path = format!("{}/main.ftl", code);
            let Some(file) = Locales::get(&path) else {
                warn!(code, "translation file not found");
                bundles.insert(locale, bundle);
                continue;
            };
            let source = String::from_utf8_lossy(file.data.as_ref()).into_owned();
            let resource = FluentResource::try_new(source).unwrap_or_else(|(partial, errors)| {
                warn!(code, errors = errors.len(), "translation file has syntax errors");
                partial
            });
            if let Err(errors) = bundle.add_resource(resource) {
                warn!(code, errors = errors.len(), "duplicate translation messages");
            }

            bundles.insert(locale, bundle);
        }

        Translator {
            bundles: Arc::new(bundles),
        }
    }

    /// Looks `key` up in `locale`, then in en-US, else returns `MISSING:<key>`.
    pub fn translate(&self, locale: ZakatLocale, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(bundle) = self.bundles.get(&locale)
            && let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value())
        {
            let mut errors = vec![];
            let value = bundle.format_pattern(pattern, args, &mut errors);
            if !errors.is_empty() {
                warn!(key, errors = errors.len(), "errors while formatting message");
            }
            return value.into_owned();
        }

        if locale != ZakatLocale::EnUS {
            return self.translate(ZakatLocale::EnUS, key, args);
        }

        format!("MISSING:{}", key)
    }

    pub fn translate_with_args(&self, locale: ZakatLocale, key: &str, args: &[(&str, String)]) -> String {
        let mut f_args = FluentArgs::new();
        for (k, v) in args {
            f_args.set(*k, v.clone());
        }
        self.translate(locale, key, Some(&f_args))
    }

    pub fn asset_kind_label(&self, locale: ZakatLocale, kind: AssetKind) -> String {
        self.translate(locale, &format!("asset-type-{}", kind), None)
    }

    /// User-facing message for an error, e.g. for a form that stays open.
    pub fn localize_error(&self, locale: ZakatLocale, err: &ZakatError) -> String {
        let Some(details) = err.as_validation() else {
            return err.to_string();
        };
        let key = match details.reason {
            ValidationReason::Missing => "error-field-missing",
            ValidationReason::NotPositive => "error-field-not-positive",
            ValidationReason::Negative => "error-field-negative",
            ValidationReason::Unparsable => "error-field-unparsable",
            ValidationReason::NotApplicable => "error-field-not-applicable",
            ValidationReason::Overflow => "error-field-overflow",
        };
        let field_key = format!("field-{}", details.field);
        let mut field = self.translate(locale, &field_key, None);
        if field.starts_with("MISSING:") {
            field = details.field.clone();
        }
        self.translate_with_args(locale, key, &[("field", field)])
    }
}

static DEFAULT_TRANSLATOR: Lazy<Translator> = Lazy::new(Translator::new);

/// Shared translator loaded from the embedded locale files.
pub fn default_translator() -> &'static Translator {
    &DEFAULT_TRANSLATOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_formatting() {
        let res_us = ZakatLocale::EnUS.format_currency(dec!(1234.56));
        assert!(res_us.starts_with('$'));
        assert!(res_us.contains("1,234.56"));

        let res_ar = ZakatLocale::ArSA.format_currency(dec!(1234.56));
        assert!(res_ar.ends_with("US$"));
    }

    #[test]
    fn test_translate_and_fallback() {
        let t = default_translator();
        assert_eq!(t.translate(ZakatLocale::EnUS, "zakat-result-nisab-met", None), "Nisab reached");
        assert_eq!(t.translate(ZakatLocale::ArSA, "asset-type-gold", None), "ذهب");
        assert_eq!(t.translate(ZakatLocale::ArSA, "no-such-key", None), "MISSING:no-such-key");
    }

    #[test]
    fn test_asset_kind_labels_exist() {
        let t = default_translator();
        for locale in ZakatLocale::ALL {
            for kind in [AssetKind::Cash, AssetKind::Gold, AssetKind::Silver, AssetKind::Stocks, AssetKind::Business] {
                assert!(!t.asset_kind_label(locale, kind).starts_with("MISSING:"));
            }
        }
    }

    #[test]
    fn test_localized_validation_error() {
        let t = default_translator();
        let err = ZakatError::Validation(ValidationError::new("weight", ValidationReason::NotPositive));
        assert_eq!(t.localize_error(ZakatLocale::EnUS, &err), "Weight must be greater than zero.");

        let err = ZakatError::Validation(ValidationError::new("goldPerGram", ValidationReason::Negative));
        assert_eq!(t.localize_error(ZakatLocale::EnUS, &err), "Gold price per gram must not be negative.");
        assert!(!t.localize_error(ZakatLocale::ArSA, &err).contains("MISSING:"));

        let other = ZakatError::Configuration("bad".to_string());
        assert_eq!(t.localize_error(ZakatLocale::EnUS, &other), "Configuration error: bad");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("ar".parse::<ZakatLocale>().unwrap(), ZakatLocale::ArSA);
        assert!("fr".parse::<ZakatLocale>().is_err());
    }
}
