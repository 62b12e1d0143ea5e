//! Input validation utilities
//!
//! Catalog clients send loosely typed JSON: numbers arrive as strings, ids as
//! either. These helpers apply the coercion and "truthiness" rules the API
//! has always accepted.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Loose truthiness of a JSON value: `null`, `false`, `0`, and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion with the same rules as JavaScript's `Number(value)`.
///
/// Returns `None` where `Number` would produce `NaN`.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [Value::Null] => Some(0.0),
            [single @ (Value::Number(_) | Value::String(_))] => to_number(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// Parse a numeric string the way `Number("...")` does
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    // Rust also accepts "inf" and "NaN" spellings that Number() rejects.
    if s.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }

    s.parse::<f64>().ok()
}

/// Resolve a loosely typed identifier to a row id.
///
/// Anything that is not an integer in the `i32` range cannot match a row.
pub fn to_row_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => parse_row_id(s),
        _ => None,
    }
}

/// Parse a path segment as a row id
pub fn parse_row_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

/// Text form of a JSON scalar as it would be bound to a text column.
///
/// Numbers print without a trailing `.0`; arrays and objects have no text
/// form.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        }),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric value of a JSON number or numeric string.
///
/// Stricter than [`to_number`]: booleans, `null` and containers are not
/// numbers here.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => parse_number(s),
        _ => None,
    }
}

/// Keep an explicit `null` distinguishable from an absent field.
///
/// Use together with `#[serde(default)]`: absent stays `None`, while `null`
/// becomes `Some(Value::Null)`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
