//! Rule specification parsing.
//!
//! A field's rules are written as a compact string such as
//! `"required|min:3|in:a,b,c"`: `|` separates rules, the first `:` separates a
//! rule name from its parameters and `,` separates the parameters.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Canonical rule name -> raw string parameters, in declaration order.
pub type RuleSet = IndexMap<String, Vec<String>>;

/// Field path -> the rules declared for it, in declaration order.
pub type RuleGroup = IndexMap<String, RuleSet>;

/// Canonicalize a rule token: `required_with` becomes `RequiredWith`.
pub fn normalize_rule_name(token: &str) -> String {
    token.split('_').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Memoizes [`normalize_rule_name`] for the tokens seen during one parse.
#[derive(Debug, Default)]
pub struct NameCache {
    names: HashMap<String, String>,
}

impl NameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical name for `token`, computed once per distinct token.
    pub fn normalize(&mut self, token: &str) -> String {
        if let Some(name) = self.names.get(token) {
            return name.clone();
        }
        let name = normalize_rule_name(token);
        self.names.insert(token.to_string(), name.clone());
        name
    }

    /// Number of distinct tokens seen.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no token has been normalized yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Split one rule token into its raw name and parameter list.
///
/// A token without `:` has no parameters, and so does `name:` with nothing after it.
pub fn split_rule(token: &str) -> (&str, Vec<String>) {
    match token.split_once(':') {
        Some((name, "")) => (name, Vec::new()),
        Some((name, parameters)) => (name, parameters.split(',').map(str::to_string).collect()),
        None => (token, Vec::new()),
    }
}

/// Parse a single field's rule string.
///
/// Empty tokens (for example from a trailing `|`) are ignored. Declaring the
/// same canonical rule twice keeps the first position and the last parameters.
pub fn parse_rule_set(spec: &str, cache: &mut NameCache) -> RuleSet {
    let mut rules = RuleSet::new();
    merge_rule_set(&mut rules, spec, cache);
    rules
}

fn merge_rule_set(rules: &mut RuleSet, spec: &str, cache: &mut NameCache) {
    for token in spec.split('|').filter(|token| !token.is_empty()) {
        let (name, parameters) = split_rule(token);
        rules.insert(cache.normalize(name), parameters);
    }
}

/// Parse a whole rule specification into a [`RuleGroup`].
///
/// Fields keep the order in which they are yielded. A field yielded more than
/// once accumulates its rules into the same entry.
pub fn parse_rules<I, K, V>(spec: I) -> RuleGroup
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    let mut cache = NameCache::new();
    let mut group = RuleGroup::new();

    for (field, rules) in spec {
        let entry = group.entry(field.into()).or_default();
        merge_rule_set(entry, rules.as_ref(), &mut cache);
    }

    group
}
