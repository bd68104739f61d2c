//! Fuzz target for rule specification parsing.
//!
//! Parsing never fails; it must not panic and must keep one entry per
//! distinct canonical rule name.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve_validation::{NameCache, normalize_rule_name, parse_rule_set, split_rule};
use std::collections::HashSet;

fuzz_target!(|spec: &str| {
    let parsed = parse_rule_set(spec, &mut NameCache::new());

    let distinct: HashSet<String> = spec
        .split('|')
        .filter(|token| !token.is_empty())
        .map(|token| normalize_rule_name(split_rule(token).0))
        .collect();
    assert_eq!(parsed.len(), distinct.len());
});
