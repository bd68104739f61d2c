// Presence rules: evaluated even for absent fields

use super::param;
use crate::coerce::loose_eq;
use crate::{Result, ValidationContext};
use serde_json::Value;

pub(super) fn required(value: &Value) -> bool {
    !value.is_null()
}

/// Required when `parameters[0]` is set.
pub(super) fn required_with(
    rule: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let other = param(rule, parameters, 0)?;
    Ok(required(value) || !ctx.is_set(other))
}

/// Passes when `parameters[0]` is not set, or when the value is present.
///
/// Evaluates like `required_with`; the two differ only in the failure message.
pub(super) fn required_without(
    rule: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let other = param(rule, parameters, 0)?;
    Ok(!ctx.is_set(other) || required(value))
}

/// Required when the other field's value is one of the options.
pub(super) fn required_if(
    rule: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let other = param(rule, parameters, 0)?;
    if required(value) || !ctx.is_set(other) {
        return Ok(true);
    }
    Ok(!matches_option(ctx.get_field(other), &parameters[1..]))
}

/// Required unless the other field's value is one of the options.
pub(super) fn required_unless(
    rule: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let other = param(rule, parameters, 0)?;
    if required(value) || !ctx.is_set(other) {
        return Ok(true);
    }
    Ok(matches_option(ctx.get_field(other), &parameters[1..]))
}

fn matches_option(value: &Value, options: &[String]) -> bool {
    options
        .iter()
        .any(|option| loose_eq(value, &Value::String(option.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InputData;
    use crate::parser::RuleGroup;
    use serde_json::json;

    fn input(value: Value) -> InputData {
        value.as_object().cloned().unwrap_or_default()
    }

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_required_with() {
        let data = input(json!({"phone": "123", "fax": null}));
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        assert!(!required_with("RequiredWith", &Value::Null, &params(&["phone"]), &ctx).unwrap());
        assert!(required_with("RequiredWith", &json!("x"), &params(&["phone"]), &ctx).unwrap());
        assert!(required_with("RequiredWith", &Value::Null, &params(&["fax"]), &ctx).unwrap());
        assert!(required_with("RequiredWith", &Value::Null, &params(&["email"]), &ctx).unwrap());
    }

    #[test]
    fn test_required_without() {
        let data = input(json!({"phone": "123"}));
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        // other field set, value missing
        assert!(!required_without("RequiredWithout", &Value::Null, &params(&["phone"]), &ctx).unwrap());
        assert!(required_without("RequiredWithout", &json!(1), &params(&["phone"]), &ctx).unwrap());
        // other field absent
        assert!(required_without("RequiredWithout", &Value::Null, &params(&["email"]), &ctx).unwrap());
        assert!(required_without("RequiredWithout", &json!(1), &params(&["email"]), &ctx).unwrap());
    }

    #[test]
    fn test_required_if_and_unless() {
        let data = input(json!({"kind": "company", "count": 2}));
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        let p = params(&["kind", "company", "charity"]);
        assert!(!required_if("RequiredIf", &Value::Null, &p, &ctx).unwrap());
        assert!(required_if("RequiredIf", &json!("ACME"), &p, &ctx).unwrap());
        assert!(required_unless("RequiredUnless", &Value::Null, &p, &ctx).unwrap());

        let p = params(&["kind", "person"]);
        assert!(required_if("RequiredIf", &Value::Null, &p, &ctx).unwrap());
        assert!(!required_unless("RequiredUnless", &Value::Null, &p, &ctx).unwrap());

        // options compare loosely against numbers
        let p = params(&["count", "2"]);
        assert!(!required_if("RequiredIf", &Value::Null, &p, &ctx).unwrap());

        let p = params(&["missing", "x"]);
        assert!(required_if("RequiredIf", &Value::Null, &p, &ctx).unwrap());
        assert!(required_unless("RequiredUnless", &Value::Null, &p, &ctx).unwrap());
    }
}
