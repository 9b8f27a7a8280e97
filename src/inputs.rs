use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

use crate::types::{Result, ValidationError, ValidationReason, ZakatError};

/// Trait for converting various types into `Decimal` for Zakat calculations.
///
/// This lets callers pass `i32`, `f64`, `&str`, etc. straight into
/// constructors without wrapping them in `dec!()` or `Decimal::from()`.
/// Errors are reported against the generic field name `amount`; callers
/// re-target them with [`ValidationError::for_field`].
pub trait IntoZakatDecimal {
    fn into_zakat_decimal(self) -> Result<Decimal>;
}

fn unparsable(raw: impl ToString) -> ZakatError {
    ZakatError::Validation(ValidationError::new("amount", ValidationReason::Unparsable).with_value(raw))
}

impl IntoZakatDecimal for Decimal {
    fn into_zakat_decimal(self) -> Result<Decimal> {
        Ok(self)
    }
}

macro_rules! impl_into_zakat_decimal_int {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_int!(i32, u32, i64, u64, isize, usize);

// NaN and infinities have no decimal form and are refused here.
macro_rules! impl_into_zakat_decimal_float {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal> {
                    Decimal::from_f64(self as f64).ok_or_else(|| unparsable(self))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_float!(f32, f64);

impl IntoZakatDecimal for &str {
    fn into_zakat_decimal(self) -> Result<Decimal> {
        let trimmed = self.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| unparsable(self))
    }
}

impl IntoZakatDecimal for String {
    fn into_zakat_decimal(self) -> Result<Decimal> {
        self.as_str().into_zakat_decimal()
    }
}

/// Converts `val` and reports any failure against `field`.
pub(crate) fn decimal_field(field: &str, val: impl IntoZakatDecimal) -> Result<Decimal, ValidationError> {
    val.into_zakat_decimal().map_err(|err| match err {
        ZakatError::Validation(v) => v.for_field(field),
        other => ValidationError::new(field, ValidationReason::Unparsable).with_value(other),
    })
}
