//! Rule registration and dispatch.
//!
//! A [`RuleCatalog`] is built once at start-up, optionally extended with
//! custom rules, and then shared read-only (usually behind an `Arc`) by every
//! [`Validator`](crate::Validator) that needs it.

use crate::parser::{RuleGroup, normalize_rule_name};
use crate::rules::{BuiltinRule, FnRule, Rule};
use crate::{Error, Result, ValidationContext};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Resolved rule implementation.
#[derive(Clone, Copy)]
pub enum RuleRef<'a> {
    /// A registered extension.
    Extension(&'a dyn Rule),
    /// A built-in rule.
    Builtin(BuiltinRule),
}

impl RuleRef<'_> {
    fn as_rule(&self) -> &dyn Rule {
        match self {
            RuleRef::Extension(rule) => *rule,
            RuleRef::Builtin(rule) => rule,
        }
    }
}

/// Table of rules available to validators.
///
/// Built-in rules are always available. Extensions registered under the same
/// canonical name shadow a built-in or an earlier extension.
pub struct RuleCatalog {
    extensions: HashMap<String, Arc<dyn Rule>>,
    force: HashSet<String>,
}

impl RuleCatalog {
    /// Create a catalog containing only the built-in rules.
    pub fn new() -> Self {
        Self {
            extensions: HashMap::new(),
            force: BuiltinRule::FORCE
                .iter()
                .map(|rule| rule.name().to_string())
                .collect(),
        }
    }

    /// Register a rule under `name`.
    pub fn register<R>(&mut self, name: &str, rule: R) -> &mut Self
    where
        R: Rule + 'static,
    {
        self.insert(name, Arc::new(rule), false)
    }

    /// Register a rule that also runs when its field is absent.
    pub fn register_force<R>(&mut self, name: &str, rule: R) -> &mut Self
    where
        R: Rule + 'static,
    {
        self.insert(name, Arc::new(rule), true)
    }

    /// Register a closure as a rule.
    ///
    /// ```
    /// use sieve_validation::RuleCatalog;
    ///
    /// let mut catalog = RuleCatalog::new();
    /// catalog.add_extension(
    ///     "even",
    ///     |_field, value, _parameters, _ctx| value.as_i64().is_some_and(|n| n % 2 == 0),
    ///     false,
    /// );
    /// assert!(catalog.contains("Even"));
    /// ```
    pub fn add_extension<F>(&mut self, name: &str, predicate: F, is_force: bool) -> &mut Self
    where
        F: Fn(&str, &Value, &[String], &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(FnRule(predicate)), is_force)
    }

    /// Builder form of [`add_extension`](Self::add_extension).
    pub fn with_extension<F>(mut self, name: &str, predicate: F, is_force: bool) -> Self
    where
        F: Fn(&str, &Value, &[String], &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.add_extension(name, predicate, is_force);
        self
    }

    fn insert(&mut self, name: &str, rule: Arc<dyn Rule>, is_force: bool) -> &mut Self {
        let name = normalize_rule_name(name);

        if self.extensions.contains_key(&name) {
            warn!(rule = %name, "Extension replaces an earlier registration");
        } else if BuiltinRule::from_name(&name).is_some() {
            warn!(rule = %name, "Extension shadows a built-in rule");
        }

        if is_force {
            self.force.insert(name.clone());
        }
        self.extensions.insert(name, rule);
        self
    }

    /// Whether `name` (canonical) runs on absent fields.
    pub fn is_force(&self, name: &str) -> bool {
        self.force.contains(name)
    }

    /// Whether a rule is known under the canonical `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Canonical names of registered extensions.
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    /// Find the implementation of a canonical rule name.
    pub fn resolve(&self, name: &str) -> Option<RuleRef<'_>> {
        if let Some(rule) = self.extensions.get(name) {
            return Some(RuleRef::Extension(rule.as_ref()));
        }
        BuiltinRule::from_name(name).map(RuleRef::Builtin)
    }

    /// Ensure every rule referenced by `rules` can be dispatched.
    pub fn check(&self, rules: &RuleGroup) -> Result<()> {
        for (field, set) in rules {
            if let Some(rule) = set.keys().find(|rule| !self.contains(rule)) {
                return Err(Error::UnknownRule {
                    field: field.clone(),
                    rule: rule.clone(),
                });
            }
        }
        Ok(())
    }

    /// Evaluate `rule` on a field.
    pub fn run(
        &self,
        field: &str,
        value: &Value,
        rule: &str,
        parameters: &[String],
        ctx: &ValidationContext<'_>,
    ) -> Result<bool> {
        let resolved = self.resolve(rule).ok_or_else(|| Error::UnknownRule {
            field: field.to_string(),
            rule: rule.to_string(),
        })?;

        let passed = resolved.as_rule().evaluate(field, value, parameters, ctx)?;
        trace!(field, rule, passed, "Rule evaluated");
        Ok(passed)
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<&str> = self.extension_names().collect();
        extensions.sort_unstable();
        let mut force: Vec<&str> = self.force.iter().map(String::as_str).collect();
        force.sort_unstable();

        f.debug_struct("RuleCatalog")
            .field("extensions", &extensions)
            .field("force", &force)
            .finish()
    }
}
