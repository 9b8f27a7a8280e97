//! Declared holdings and the form-shaped input used to create them.
//!
//! Cash-like holdings carry a value; gold and silver carry a weight and a
//! price per gram from which the value is derived. [`Holding`] encodes that
//! split so a metal without a weight, or cash with one, cannot be built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::inputs::{decimal_field, IntoZakatDecimal};
use crate::types::{format_amount, Result, ValidationError, ValidationReason, ZakatError};

/// Classification chosen when declaring an asset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
    Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AssetKind {
    Cash,
    Gold,
    Silver,
    Stocks,
    Business,
}

impl AssetKind {
    pub fn is_precious_metal(&self) -> bool {
        matches!(self, AssetKind::Gold | AssetKind::Silver)
    }
}

/// Cash-like kinds, valued directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MonetaryKind {
    Cash,
    Stocks,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Metal {
    Gold,
    Silver,
}

impl From<MonetaryKind> for AssetKind {
    fn from(kind: MonetaryKind) -> Self {
        match kind {
            MonetaryKind::Cash => AssetKind::Cash,
            MonetaryKind::Stocks => AssetKind::Stocks,
            MonetaryKind::Business => AssetKind::Business,
        }
    }
}

impl From<Metal> for AssetKind {
    fn from(metal: Metal) -> Self {
        match metal {
            Metal::Gold => AssetKind::Gold,
            Metal::Silver => AssetKind::Silver,
        }
    }
}

/// What an asset holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Holding {
    #[serde(rename_all = "camelCase")]
    Monetary { kind: MonetaryKind, value: Decimal },
    #[serde(rename_all = "camelCase")]
    PreciousMetal {
        metal: Metal,
        weight_grams: Decimal,
        price_per_gram: Decimal,
    },
}

impl Holding {
    pub fn kind(&self) -> AssetKind {
        match self {
            Holding::Monetary { kind, .. } => (*kind).into(),
            Holding::PreciousMetal { metal, .. } => (*metal).into(),
        }
    }

    /// Value of the holding, `None` if `weight × price` overflows.
    pub fn checked_value(&self) -> Option<Decimal> {
        match self {
            Holding::Monetary { value, .. } => Some(*value),
            Holding::PreciousMetal {
                weight_grams,
                price_per_gram,
                ..
            } => weight_grams.checked_mul(*price_per_gram),
        }
    }
}

/// Opaque, unique asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AssetId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One declared holding. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    id: AssetId,
    holding: Holding,
}

impl Asset {
    pub(crate) fn new(id: AssetId, holding: Holding) -> Self {
        Self { id, holding }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn kind(&self) -> AssetKind {
        self.holding.kind()
    }

    pub fn holding(&self) -> &Holding {
        &self.holding
    }

    /// Monetary value. Zero if the derived metal value overflows, which only
    /// happens for data that bypassed validation.
    pub fn value(&self) -> Decimal {
        self.checked_value().unwrap_or(Decimal::ZERO)
    }

    pub fn checked_value(&self) -> Option<Decimal> {
        self.holding.checked_value()
    }

    /// Weight in grams, for gold and silver only.
    pub fn weight(&self) -> Option<Decimal> {
        match &self.holding {
            Holding::PreciousMetal { weight_grams, .. } => Some(*weight_grams),
            Holding::Monetary { .. } => None,
        }
    }

    /// Price per gram, for gold and silver only.
    pub fn price_per_unit(&self) -> Option<Decimal> {
        match &self.holding {
            Holding::PreciousMetal { price_per_gram, .. } => Some(*price_per_gram),
            Holding::Monetary { .. } => None,
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.holding {
            Holding::Monetary { value, .. } => write!(f, "{}: {}", self.kind(), format_amount(*value)),
            Holding::PreciousMetal {
                weight_grams,
                price_per_gram,
                ..
            } => write!(
                f,
                "{}: {} g × {} = {}",
                self.kind(),
                weight_grams.normalize(),
                format_amount(*price_per_gram),
                format_amount(self.value())
            ),
        }
    }
}

/// Form-shaped payload for adding an asset.
///
/// Fields are optional so a half-filled form can be represented;
/// [`AssetInput::validate`] decides whether it describes a valid holding.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetInput {
    kind: AssetKind,
    value: Option<Decimal>,
    weight: Option<Decimal>,
    price_per_unit: Option<Decimal>,
    invalid: Option<ValidationError>,
}

impl AssetInput {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            value: None,
            weight: None,
            price_per_unit: None,
            invalid: None,
        }
    }

    pub fn cash(value: impl IntoZakatDecimal) -> Self {
        Self::new(AssetKind::Cash).value(value)
    }

    pub fn stocks(value: impl IntoZakatDecimal) -> Self {
        Self::new(AssetKind::Stocks).value(value)
    }

    pub fn business(value: impl IntoZakatDecimal) -> Self {
        Self::new(AssetKind::Business).value(value)
    }

    pub fn gold(weight: impl IntoZakatDecimal, price_per_gram: impl IntoZakatDecimal) -> Self {
        Self::new(AssetKind::Gold).weight(weight).price_per_unit(price_per_gram)
    }

    pub fn silver(weight: impl IntoZakatDecimal, price_per_gram: impl IntoZakatDecimal) -> Self {
        Self::new(AssetKind::Silver).weight(weight).price_per_unit(price_per_gram)
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn value(mut self, val: impl IntoZakatDecimal) -> Self {
        self.value = self.record("value", val);
        self
    }

    /// Weight in grams.
    pub fn weight(mut self, val: impl IntoZakatDecimal) -> Self {
        self.weight = self.record("weight", val);
        self
    }

    /// Price per gram.
    pub fn price_per_unit(mut self, val: impl IntoZakatDecimal) -> Self {
        self.price_per_unit = self.record("pricePerUnit", val);
        self
    }

    // Keeps the first conversion failure so validate() can report it.
    fn record(&mut self, field: &str, val: impl IntoZakatDecimal) -> Option<Decimal> {
        match decimal_field(field, val) {
            Ok(v) => Some(v),
            Err(err) => {
                self.invalid.get_or_insert(err);
                None
            }
        }
    }

    /// Turns the input into a [`Holding`], or reports the first bad field.
    pub fn validate(&self) -> Result<Holding> {
        if let Some(err) = &self.invalid {
            return Err(err.clone().into());
        }

        match self.kind {
            AssetKind::Cash | AssetKind::Stocks | AssetKind::Business => {
                reject_present("weight", self.weight)?;
                reject_present("pricePerUnit", self.price_per_unit)?;
                let value = require_positive("value", self.value)?;
                let kind = match self.kind {
                    AssetKind::Stocks => MonetaryKind::Stocks,
                    AssetKind::Business => MonetaryKind::Business,
                    _ => MonetaryKind::Cash,
                };
                Ok(Holding::Monetary { kind, value })
            }
            AssetKind::Gold | AssetKind::Silver => {
                reject_present("value", self.value)?;
                let weight_grams = require_positive("weight", self.weight)?;
                let price_per_gram = require_positive("pricePerUnit", self.price_per_unit)?;
                let value = weight_grams.checked_mul(price_per_gram).ok_or_else(|| {
                    ZakatError::validation("value", ValidationReason::Overflow)
                })?;
                // Tiny weights and prices can still round to zero.
                if value <= Decimal::ZERO {
                    return Err(ValidationError::new("value", ValidationReason::NotPositive)
                        .with_value(value)
                        .into());
                }
                let metal = if self.kind == AssetKind::Gold { Metal::Gold } else { Metal::Silver };
                Ok(Holding::PreciousMetal {
                    metal,
                    weight_grams,
                    price_per_gram,
                })
            }
        }
    }
}

fn require_positive(field: &str, val: Option<Decimal>) -> Result<Decimal> {
    match val {
        None => Err(ZakatError::validation(field, ValidationReason::Missing)),
        Some(v) if v <= Decimal::ZERO => {
            Err(ValidationError::new(field, ValidationReason::NotPositive).with_value(v).into())
        }
        Some(v) => Ok(v),
    }
}

fn reject_present(field: &str, val: Option<Decimal>) -> Result<()> {
    match val {
        Some(v) => Err(ValidationError::new(field, ValidationReason::NotApplicable)
            .with_value(v)
            .into()),
        None => Ok(()),
    }
}
