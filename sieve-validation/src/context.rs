//! Field resolution and the read-only context handed to every rule.

use crate::parser::{RuleGroup, RuleSet};
use serde_json::{Map, Value};

/// Input data being validated.
pub type InputData = Map<String, Value>;

static NULL: Value = Value::Null;

/// Walk a dot-separated path through nested objects and arrays.
///
/// Returns `None` as soon as a segment is missing. A key holding `null` is
/// still found.
pub fn resolve<'a>(data: &'a InputData, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Whether every segment of `path` exists in `data`.
pub fn has_field(data: &InputData, path: &str) -> bool {
    resolve(data, path).is_some()
}

/// Value at `path`, or the `null` sentinel when the path does not exist.
///
/// Callers distinguish "absent" from "null" with [`has_field`] first.
pub fn get_field<'a>(data: &'a InputData, path: &str) -> &'a Value {
    resolve(data, path).unwrap_or(&NULL)
}

/// Read-only view of the validation run passed to every rule.
///
/// Cross-field rules such as `confirm` or `required_with` read sibling
/// fields through it.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    data: &'a InputData,
    rules: &'a RuleGroup,
}

impl<'a> ValidationContext<'a> {
    /// Create a context over input data and its parsed rules.
    pub fn new(data: &'a InputData, rules: &'a RuleGroup) -> Self {
        Self { data, rules }
    }

    /// The full input data.
    pub fn data(&self) -> &'a InputData {
        self.data
    }

    /// Whether `path` exists in the input, even if it holds `null`.
    pub fn has_field(&self, path: &str) -> bool {
        has_field(self.data, path)
    }

    /// Value at `path`, `null` when absent.
    pub fn get_field(&self, path: &str) -> &'a Value {
        get_field(self.data, path)
    }

    /// Whether `path` exists and holds something other than `null`.
    pub fn is_set(&self, path: &str) -> bool {
        resolve(self.data, path).is_some_and(|value| !value.is_null())
    }

    /// Rules declared for `field`.
    pub fn rules_for(&self, field: &str) -> Option<&'a RuleSet> {
        self.rules.get(field)
    }

    /// Whether `field` declares the canonical rule `rule`.
    pub fn declares(&self, field: &str, rule: &str) -> bool {
        self.rules_for(field)
            .is_some_and(|rules| rules.contains_key(rule))
    }
}
