//! Store number parsing and integer/float normalization.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// A number as written to the graph or to the exported products file.
///
/// Serializes untagged, so `Int(10)` becomes `10` and `Float(10.5)` becomes
/// `10.5` in both JSON and YAML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse the text of a store number.
    ///
    /// Plain (`10.5`) and scientific (`1.05E+1`) notation are accepted. Values
    /// that fit a `Decimal` are normalized exactly with [`Number::from_decimal`].
    /// The store allows 38 significant digits and exponents down to -130 and
    /// up to +125, which a `Decimal` cannot hold; those fall back to `i64`
    /// when integral and in range, and to `f64` otherwise.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let decimal = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok();
        match decimal.map(Number::from_decimal) {
            Some(Number::Int(i)) => return Some(Number::Int(i)),
            // Parsing the text directly rounds once instead of twice.
            Some(float) => return Some(text.parse::<f64>().map(Number::Float).unwrap_or(float)),
            None => {}
        }

        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Float)
    }

    /// Integral decimals become `Int`, everything else `Float`.
    ///
    /// Integral values that do not fit in an `i64` fall back to `Float`.
    pub fn from_decimal(value: Decimal) -> Self {
        if value.fract().is_zero() {
            if let Some(i) = value.to_i64() {
                return Number::Int(i);
            }
        }
        Number::Float(value.to_f64().unwrap_or(f64::NAN))
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Number::from_decimal(value)
    }
}
