// Scalar coercions shared by the built-in rules

use serde_json::Value;
use std::borrow::Cow;

/// String form of a scalar value.
///
/// `null` and `false` become `""`, `true` becomes `"1"` and numbers are
/// written out. Arrays and objects have no string form.
pub fn string_form(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null | Value::Bool(false) => Some(Cow::Borrowed("")),
        Value::Bool(true) => Some(Cow::Borrowed("1")),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an integer literal: optional sign, digits, no leading zeros.
pub fn parse_int_str(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }

    text.parse().ok()
}

/// Parse a finite float literal.
pub fn parse_float_str(text: &str) -> Option<f64> {
    let text = text.trim();
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Integer reading of a value, if it has one.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::Array(_) | Value::Object(_) | Value::Null => None,
        other => string_form(other).and_then(|s| parse_int_str(&s)),
    }
}

/// Float reading of a value, if it has one.
pub fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Array(_) | Value::Object(_) | Value::Null => None,
        other => string_form(other).and_then(|s| parse_float_str(&s)),
    }
}

/// Whether a value reads as a number.
pub fn is_numeric(value: &Value) -> bool {
    as_int(value).is_some() || as_float(value).is_some()
}

/// Truthiness of a value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Informal comparison.
///
/// Numbers and numeric strings compare by value, booleans compare by
/// truthiness and everything else compares by string form.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(b), other) | (other, Value::Bool(b)) => truthy(other) == *b,
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            left == right
        }
        _ => match (numeric_scalar(left), numeric_scalar(right)) {
            (Some(a), Some(b)) => a == b,
            _ => string_form(left) == string_form(right),
        },
    }
}

fn numeric_scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_str(s),
        _ => None,
    }
}
