//! Tolerant deserializers for optional feed properties.
//!
//! Feeds occasionally send a count as a float, a flag as `1.0`, or a
//! number as a string. An optional property that cannot be read becomes
//! `None` instead of failing the whole feature.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn read<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Option::<Value>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

/// Any finite number, or a string holding one.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(as_number(&read(deserializer)?))
}

/// A non-negative count. Fractions truncate; negative values read as `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(as_number(&read(deserializer)?)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u32))
}

/// Epoch milliseconds, integral or not.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
#[allow(clippy::cast_possible_truncation)]
pub fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = read(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| as_number(&value).map(|n| n as i64)))
}

/// A flag: non-zero numbers and `true` are set.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = read(deserializer)?;
    Ok(match value {
        Value::Bool(b) => Some(b),
        other => as_number(&other).map(|n| n.abs() > 0.0),
    })
}

/// Text. Numbers and booleans are kept in their JSON spelling.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match read(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}
