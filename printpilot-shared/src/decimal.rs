//! Fixed-point helpers. Every monetary amount and every dimension is a
//! `rust_decimal::Decimal`; on the wire it is a string with exactly two
//! fraction digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

pub const SCALE: u32 = 2;

/// Half away from zero, two places.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format2(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Largest amount a NUMERIC(10,2) column holds.
pub fn money_limit() -> Decimal {
    Decimal::new(99_999_999_99, 2)
}

/// Largest width or height a NUMERIC(12,4) column holds.
pub fn dimension_limit() -> Decimal {
    Decimal::new(99_999_999_9999, 4)
}

/// Fraction digits that carry information: `0.50` has one, `0.125` three.
pub fn places(value: Decimal) -> u32 {
    value.normalize().scale()
}

pub fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let raw = raw.trim();
    Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw))
}

/// Accepts `"6.50"` as well as `6.5`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    fn into_decimal(self) -> Result<Decimal, String> {
        let raw = match self {
            DecimalInput::Text(s) => s,
            DecimalInput::Number(n) => n.to_string(),
        };
        parse_decimal(&raw).map_err(|e| format!("invalid decimal '{}': {}", raw, e))
    }
}

/// `#[serde(with = "printpilot_shared::decimal::fixed2")]`
pub mod fixed2 {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format2(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        DecimalInput::deserialize(deserializer)?
            .into_decimal()
            .map_err(serde::de::Error::custom)
    }
}

/// Same as [`fixed2`] for optional fields; pair with `#[serde(default)]`.
pub mod fixed2_opt {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&format2(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        match Option::<DecimalInput>::deserialize(deserializer)? {
            Some(input) => input.into_decimal().map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
