// Type rules

use crate::coerce::{as_float, as_int, is_numeric, string_form};
use serde_json::Value;

const ACCEPTED: &[&str] = &["yes", "on", "1"];

/// Checkbox-style acceptance: `yes`, `on` or `1`, ignoring case.
pub(super) fn accept(value: &Value) -> bool {
    string_form(value).is_some_and(|s| ACCEPTED.contains(&s.to_lowercase().as_str()))
}

/// Exactly `true`, `false`, `0`, `1`, `"0"` or `"1"`.
pub(super) fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    }
}

pub(super) fn integer(value: &Value) -> bool {
    as_int(value).is_some()
}

pub(super) fn float(value: &Value) -> bool {
    as_float(value).is_some()
}

pub(super) fn numeric(value: &Value) -> bool {
    is_numeric(value)
}

/// Lists and maps both count as arrays.
pub(super) fn array(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

/// A string holding a JSON object or array.
pub(super) fn json(value: &Value) -> bool {
    value
        .as_str()
        .and_then(|s| serde_json::from_str::<Value>(s).ok())
        .is_some_and(|decoded| decoded.is_array() || decoded.is_object())
}
