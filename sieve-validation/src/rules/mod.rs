//! Rule capability and the built-in rule set.
//!
//! Every rule, built in or registered, implements [`Rule`]. Built-ins are
//! the [`BuiltinRule`] variants; closures are adapted with [`FnRule`].

mod date;
mod format;
mod presence;
mod size;
mod types;

pub use size::compute_size;

use crate::{Error, Result, ValidationContext};
use serde_json::Value;
use std::fmt;

/// A validation predicate.
pub trait Rule: Send + Sync {
    /// Check `value` of `field` against this rule.
    ///
    /// `Ok(false)` is a validation failure. `Err` means the rule itself is
    /// misconfigured, e.g. a required parameter is missing.
    fn evaluate(
        &self,
        field: &str,
        value: &Value,
        parameters: &[String],
        ctx: &ValidationContext<'_>,
    ) -> Result<bool>;
}

/// Adapter turning a closure into a [`Rule`].
pub struct FnRule<F>(pub F);

impl<F> Rule for FnRule<F>
where
    F: Fn(&str, &Value, &[String], &ValidationContext<'_>) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        field: &str,
        value: &Value,
        parameters: &[String],
        ctx: &ValidationContext<'_>,
    ) -> Result<bool> {
        Ok((self.0)(field, value, parameters, ctx))
    }
}

macro_rules! builtin_rules {
    ($($variant:ident),* $(,)?) => {
        /// Rules available without registration.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltinRule {
            $($variant,)*
        }

        impl BuiltinRule {
            /// Every built-in rule.
            pub const ALL: &'static [BuiltinRule] = &[$(BuiltinRule::$variant,)*];

            /// Look up a built-in by canonical name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(BuiltinRule::$variant),)*
                    _ => None,
                }
            }

            /// Canonical name of the rule.
            pub fn name(&self) -> &'static str {
                match self {
                    $(BuiltinRule::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

builtin_rules!(
    Required,
    RequiredWith,
    RequiredWithout,
    RequiredIf,
    RequiredUnless,
    Different,
    Confirm,
    Accept,
    Boolean,
    Numeric,
    Integer,
    Float,
    String,
    Array,
    Nullable,
    Size,
    Min,
    Max,
    Range,
    Regex,
    In,
    Url,
    Email,
    Ip,
    Date,
    DateFormat,
    DateBefore,
    DateAfter,
    Json,
);

impl BuiltinRule {
    /// Rules evaluated even when their field is absent from the input.
    pub const FORCE: &'static [BuiltinRule] = &[
        BuiltinRule::Required,
        BuiltinRule::RequiredIf,
        BuiltinRule::RequiredWith,
        BuiltinRule::RequiredUnless,
        BuiltinRule::RequiredWithout,
    ];

    /// Whether this rule runs on absent fields.
    pub fn is_force(&self) -> bool {
        Self::FORCE.contains(self)
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Rule for BuiltinRule {
    fn evaluate(
        &self,
        field: &str,
        value: &Value,
        parameters: &[String],
        ctx: &ValidationContext<'_>,
    ) -> Result<bool> {
        let rule = self.name();
        match self {
            BuiltinRule::Required => Ok(presence::required(value)),
            BuiltinRule::RequiredWith => presence::required_with(rule, value, parameters, ctx),
            BuiltinRule::RequiredWithout => {
                presence::required_without(rule, value, parameters, ctx)
            }
            BuiltinRule::RequiredIf => presence::required_if(rule, value, parameters, ctx),
            BuiltinRule::RequiredUnless => presence::required_unless(rule, value, parameters, ctx),
            BuiltinRule::Different => format::different(rule, value, parameters, ctx),
            BuiltinRule::Confirm => format::confirm(rule, value, parameters, ctx),
            BuiltinRule::Accept => Ok(types::accept(value)),
            BuiltinRule::Boolean => Ok(types::boolean(value)),
            BuiltinRule::Numeric => Ok(types::numeric(value)),
            BuiltinRule::Integer => Ok(types::integer(value)),
            BuiltinRule::Float => Ok(types::float(value)),
            BuiltinRule::String => Ok(value.is_string()),
            BuiltinRule::Array => Ok(types::array(value)),
            BuiltinRule::Nullable => Ok(true),
            BuiltinRule::Size => size::size(rule, field, value, parameters, ctx),
            BuiltinRule::Min => size::min(rule, field, value, parameters, ctx),
            BuiltinRule::Max => size::max(rule, field, value, parameters, ctx),
            BuiltinRule::Range => size::range(rule, field, value, parameters, ctx),
            BuiltinRule::Regex => format::matches_pattern(value, parameters),
            BuiltinRule::In => Ok(format::one_of(value, parameters)),
            BuiltinRule::Url => Ok(format::valid_url(value)),
            BuiltinRule::Email => Ok(format::valid_email(value)),
            BuiltinRule::Ip => Ok(format::valid_ip(value)),
            BuiltinRule::Date => Ok(date::date(value)),
            BuiltinRule::DateFormat => date::date_format(rule, value, parameters),
            BuiltinRule::DateBefore => date::date_before(rule, value, parameters),
            BuiltinRule::DateAfter => date::date_after(rule, value, parameters),
            BuiltinRule::Json => Ok(types::json(value)),
        }
    }
}

/// Parameter at `index`, or a [`Error::MissingParameter`].
pub(crate) fn param<'p>(rule: &str, parameters: &'p [String], index: usize) -> Result<&'p str> {
    parameters
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::MissingParameter {
            rule: rule.to_string(),
            index,
        })
}

/// Parameter at `index` read as a number.
pub(crate) fn numeric_param(rule: &str, parameters: &[String], index: usize) -> Result<f64> {
    let raw = param(rule, parameters, index)?;
    parse_bound(rule, raw)
}

pub(crate) fn parse_bound(rule: &str, raw: &str) -> Result<f64> {
    crate::coerce::parse_float_str(raw)
        .ok_or_else(|| Error::invalid_parameter(rule, raw, "expected a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InputData;
    use crate::parser::RuleGroup;
    use serde_json::json;

    fn check(rule: BuiltinRule, value: Value, parameters: &[&str]) -> Result<bool> {
        let data = InputData::new();
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);
        let parameters: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
        rule.evaluate("field", &value, &parameters, &ctx)
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(BuiltinRule::from_name("RequiredIf"), Some(BuiltinRule::RequiredIf));
        assert_eq!(BuiltinRule::from_name("DateFormat"), Some(BuiltinRule::DateFormat));
        assert_eq!(BuiltinRule::from_name("required"), None);
        assert_eq!(BuiltinRule::from_name("Even"), None);
        for rule in BuiltinRule::ALL {
            assert_eq!(BuiltinRule::from_name(rule.name()), Some(*rule));
        }
    }

    #[test]
    fn test_force_rules() {
        assert!(BuiltinRule::Required.is_force());
        assert!(BuiltinRule::RequiredWithout.is_force());
        assert!(!BuiltinRule::Min.is_force());
        assert!(!BuiltinRule::Nullable.is_force());
    }

    #[test]
    fn test_missing_parameter_is_an_error() {
        let err = check(BuiltinRule::Min, json!("abc"), &[]).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { index: 0, .. }));

        let err = check(BuiltinRule::Confirm, json!("abc"), &[]).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { .. }));
    }

    #[test]
    fn test_fn_rule_adapter() {
        fn is_even(_: &str, value: &Value, _: &[String], _: &ValidationContext<'_>) -> bool {
            value.as_i64().is_some_and(|n| n % 2 == 0)
        }

        let even = FnRule(is_even);
        let data = InputData::new();
        let rules = RuleGroup::new();
        let ctx = ValidationContext::new(&data, &rules);

        assert!(even.evaluate("n", &json!(4), &[], &ctx).unwrap());
        assert!(!even.evaluate("n", &json!(3), &[], &ctx).unwrap());
    }

    #[test]
    fn test_simple_type_rules() {
        assert!(check(BuiltinRule::String, json!("x"), &[]).unwrap());
        assert!(!check(BuiltinRule::String, json!(1), &[]).unwrap());
        assert!(check(BuiltinRule::Nullable, json!(null), &[]).unwrap());
        assert!(check(BuiltinRule::Required, json!(""), &[]).unwrap());
        assert!(!check(BuiltinRule::Required, json!(null), &[]).unwrap());
    }
}
