//! Lenient numeric decoding for loosely typed backend JSON

use bigdecimal::BigDecimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parse a decimal from free text, `None` for anything non-numeric
pub fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    BigDecimal::from_str(trimmed).ok()
}

/// Read a decimal out of an arbitrary JSON value
pub fn amount_from_value(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(number) => BigDecimal::from_str(&number.to_string()).ok(),
        Value::String(text) => parse_amount(text),
        _ => None,
    }
}

/// Serde adapter: never fails on the value itself, non-numeric input becomes `None`
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(amount_from_value))
}

/// Serde adapter for status-like enums: only strings are decoded, anything else becomes `None`
pub fn lenient_variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(text @ Value::String(_)) => serde_json::from_value(text).ok(),
        _ => None,
    })
}

/// Like [`lenient_variant`], falling back to the type's default
pub fn lenient_variant_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_variant(deserializer)?.unwrap_or_default())
}

pub fn or_zero(amount: Option<&BigDecimal>) -> BigDecimal {
    amount.cloned().unwrap_or_else(|| BigDecimal::from(0))
}

/// Clamp negative amounts to 0
pub fn non_negative(amount: BigDecimal) -> BigDecimal {
    if amount < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        amount
    }
}
