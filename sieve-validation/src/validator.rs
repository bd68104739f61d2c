//! The validation run.

use crate::catalog::RuleCatalog;
use crate::context::{InputData, ValidationContext};
use crate::messages::MessageCatalog;
use crate::parser::{RuleGroup, parse_rules};
use crate::{Error, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

static DEFAULT_MESSAGES: Lazy<Arc<MessageCatalog>> =
    Lazy::new(|| Arc::new(MessageCatalog::default()));

/// Failure messages of one run, keyed by field then by canonical rule name.
///
/// Fields appear in the order they were declared, rules in the order they
/// were declared on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureSet {
    fields: IndexMap<String, IndexMap<String, String>>,
}

impl FailureSet {
    /// Create an empty failure set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed rule.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.fields
            .entry(field.into())
            .or_default()
            .insert(rule.into(), message.into());
    }

    /// Messages for a field, keyed by rule.
    pub fn get(&self, field: &str) -> Option<&IndexMap<String, String>> {
        self.fields.get(field)
    }

    /// First message recorded for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|rules| rules.values().next())
            .map(String::as_str)
    }

    /// Whether `field` failed `rule`.
    pub fn has(&self, field: &str, rule: &str) -> bool {
        self.get(field).is_some_and(|rules| rules.contains_key(rule))
    }

    /// Names of the failed fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Number of failed rules across all fields.
    pub fn count(&self) -> usize {
        self.fields.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, IndexMap<String, String>> {
        self.fields.iter()
    }

    /// Remove every failure.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Convert to JSON: `{"errors": {field: {rule: message}}}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "errors": self.fields })
    }
}

impl fmt::Display for FailureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, rules) in &self.fields {
            for message in rules.values() {
                writeln!(f, "{}: {}", field, message)?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FailureSet {
    type Item = (&'a String, &'a IndexMap<String, String>);
    type IntoIter = indexmap::map::Iter<'a, String, IndexMap<String, String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Validates one input mapping against a rule specification.
///
/// # Examples
///
/// ```
/// use sieve_validation::{RuleCatalog, Validator};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let catalog = Arc::new(RuleCatalog::new());
/// let mut validator = Validator::from_value(
///     catalog,
///     json!({"name": "al"}),
///     [("name", "required|string|min:3"), ("email", "required|email")],
/// )
/// .unwrap();
///
/// assert!(!validator.validate().unwrap());
/// assert_eq!(validator.fails(), vec!["name", "email"]);
/// assert_eq!(validator.messages().first("name"), Some("name must be at least 3"));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    data: InputData,
    rules: RuleGroup,
    catalog: Arc<RuleCatalog>,
    messages: Arc<MessageCatalog>,
    failures: FailureSet,
}

impl Validator {
    /// Parse `rules` and check every referenced rule exists in `catalog`.
    pub fn new<I, K, V>(catalog: Arc<RuleCatalog>, data: InputData, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let rules = parse_rules(rules);
        catalog.check(&rules)?;
        debug!(fields = rules.len(), "Validator created");

        Ok(Self {
            data,
            rules,
            catalog,
            messages: Arc::clone(&*DEFAULT_MESSAGES),
            failures: FailureSet::new(),
        })
    }

    /// Like [`new`](Self::new) for input held in a JSON object value.
    pub fn from_value<I, K, V>(catalog: Arc<RuleCatalog>, data: Value, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        match data {
            Value::Object(map) => Self::new(catalog, map, rules),
            other => Err(Error::InvalidInput(format!(
                "expected an object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Use a different message catalog.
    pub fn with_messages(mut self, messages: Arc<MessageCatalog>) -> Self {
        self.messages = messages;
        self
    }

    /// Run every declared rule and return whether all passed.
    ///
    /// Absent fields only run their force rules. Errors in the rule
    /// specification abort the run and leave no failures behind.
    pub fn validate(&mut self) -> Result<bool> {
        self.failures.clear();
        self.failures = self.evaluate()?;

        debug!(
            fields = self.rules.len(),
            failed = self.failures.len(),
            "Validation finished"
        );
        Ok(self.failures.is_empty())
    }

    fn evaluate(&self) -> Result<FailureSet> {
        let ctx = ValidationContext::new(&self.data, &self.rules);
        let mut failures = FailureSet::new();

        for (field, rules) in &self.rules {
            let present = ctx.has_field(field);
            let value = ctx.get_field(field);

            let mut selected = rules
                .iter()
                .filter(|(rule, _)| present || self.catalog.is_force(rule))
                .peekable();
            if selected.peek().is_none() {
                trace!(field = %field, "Absent field has no force rules, skipped");
                continue;
            }

            for (rule, parameters) in selected {
                if !self.catalog.run(field, value, rule, parameters, &ctx)? {
                    let message = self.messages.build(rule, field, parameters)?;
                    failures.insert(field.as_str(), rule.as_str(), message);
                }
            }
        }

        Ok(failures)
    }

    /// Names of the fields that failed, in declaration order.
    pub fn fails(&self) -> Vec<&str> {
        self.failures.fields().collect()
    }

    /// Failure messages of the last run.
    pub fn messages(&self) -> &FailureSet {
        &self.failures
    }

    /// The input data.
    pub fn data(&self) -> &InputData {
        &self.data
    }

    /// The parsed rules.
    pub fn rules(&self) -> &RuleGroup {
        &self.rules
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
