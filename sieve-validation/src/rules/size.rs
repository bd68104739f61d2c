// Size rules: size, min, max, range

use super::{numeric_param, parse_bound};
use crate::coerce::{as_float, as_int, string_form};
use crate::{Result, ValidationContext};
use serde_json::Value;

/// Size of a value as seen by `size`, `min`, `max` and `range`.
///
/// A string on a field that also declares `string` measures its length.
/// Otherwise lists and maps count their entries, numeric values (including
/// numeric strings) measure their magnitude, and anything else falls back to
/// the length of its string form. Lengths are counted in characters.
pub fn compute_size(field: &str, value: &Value, ctx: &ValidationContext<'_>) -> f64 {
    if let Value::String(s) = value
        && ctx.declares(field, "String")
    {
        return s.chars().count() as f64;
    }

    match value {
        Value::Array(items) => items.len() as f64,
        Value::Object(map) => map.len() as f64,
        _ => as_int(value)
            .map(|n| n as f64)
            .or_else(|| as_float(value))
            .unwrap_or_else(|| {
                string_form(value).map_or(0.0, |s| s.chars().count() as f64)
            }),
    }
}

pub(super) fn size(
    rule: &str,
    field: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let expected = numeric_param(rule, parameters, 0)?;
    Ok(compute_size(field, value, ctx) == expected)
}

pub(super) fn min(
    rule: &str,
    field: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let bound = numeric_param(rule, parameters, 0)?;
    Ok(compute_size(field, value, ctx) >= bound)
}

pub(super) fn max(
    rule: &str,
    field: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let bound = numeric_param(rule, parameters, 0)?;
    Ok(compute_size(field, value, ctx) <= bound)
}

/// Inclusive bounds; an empty bound leaves that side open.
///
/// Without parameters, or with both bounds empty, the rule fails.
pub(super) fn range(
    rule: &str,
    field: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let lower = optional_bound(rule, parameters.first())?;
    let upper = optional_bound(rule, parameters.get(1))?;

    if lower.is_none() && upper.is_none() {
        return Ok(false);
    }

    let size = compute_size(field, value, ctx);
    Ok(lower.is_none_or(|lo| size >= lo) && upper.is_none_or(|hi| size <= hi))
}

fn optional_bound(rule: &str, raw: Option<&String>) -> Result<Option<f64>> {
    match raw.map(String::as_str) {
        None | Some("") => Ok(None),
        Some(raw) => parse_bound(rule, raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::context::InputData;
    use crate::parser::{RuleGroup, parse_rules};
    use serde_json::json;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn size_of(spec: &str, value: Value) -> f64 {
        let data = InputData::new();
        let rules = parse_rules([("f", spec)]);
        let ctx = ValidationContext::new(&data, &rules);
        compute_size("f", &value, &ctx)
    }

    #[test]
    fn test_compute_size_disambiguation() {
        assert_eq!(size_of("string|max:3", json!("12345")), 5.0);
        assert_eq!(size_of("max:3", json!("12345")), 12345.0);
        assert_eq!(size_of("min:3", json!("ab")), 2.0);
        assert_eq!(size_of("max:3", json!([1, 2, 3, 4])), 4.0);
        assert_eq!(size_of("max:3", json!({"a": 1})), 1.0);
        assert_eq!(size_of("max:3", json!(2.5)), 2.5);
        assert_eq!(size_of("max:3", json!("héllo")), 5.0);
        assert_eq!(size_of("max:3", json!(null)), 0.0);
    }

    #[test]
    fn test_range_bounds() {
        let data = InputData::new();
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        assert!(range("Range", "f", &json!(10), &params(&["", "10"]), &ctx).unwrap());
        assert!(!range("Range", "f", &json!(11), &params(&["", "10"]), &ctx).unwrap());
        assert!(!range("Range", "f", &json!(5), &params(&["", ""]), &ctx).unwrap());
        assert!(!range("Range", "f", &json!(5), &params(&[]), &ctx).unwrap());
        assert!(range("Range", "f", &json!(5), &params(&["5"]), &ctx).unwrap());
        assert!(!range("Range", "f", &json!(4), &params(&["5", ""]), &ctx).unwrap());
        assert!(range("Range", "f", &json!(7), &params(&["5", "8"]), &ctx).unwrap());
        assert!(!range("Range", "f", &json!(9), &params(&["5", "8"]), &ctx).unwrap());
    }

    #[test]
    fn test_size_min_max() {
        let data = InputData::new();
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        assert!(size("Size", "f", &json!([1, 2]), &params(&["2"]), &ctx).unwrap());
        assert!(!size("Size", "f", &json!("abc"), &params(&["2"]), &ctx).unwrap());
        assert!(min("Min", "f", &json!(3), &params(&["3"]), &ctx).unwrap());
        assert!(!max("Max", "f", &json!(4), &params(&["3"]), &ctx).unwrap());
    }

    #[test]
    fn test_non_numeric_bound_is_an_error() {
        let data = InputData::new();
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        let err = min("Min", "f", &json!(3), &params(&["three"]), &ctx).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }
}
