//! Fuzz target for full validation runs.
//!
//! Arbitrary rule strings may be rejected as configuration errors, but a
//! validator that was built must never panic while validating.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use sieve_validation::{RuleCatalog, Validator};
use std::sync::Arc;

/// Arbitrary payload and rules for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzRun {
    /// Raw JSON input
    input: String,
    /// Field paths and their rule strings
    rules: Vec<(String, String)>,
}

fuzz_target!(|run: FuzzRun| {
    let Ok(data) = serde_json::from_str::<Value>(&run.input) else {
        return;
    };

    let catalog = Arc::new(RuleCatalog::new());
    if let Ok(mut validator) = Validator::from_value(catalog, data, run.rules) {
        if let Ok(valid) = validator.validate() {
            assert_eq!(valid, validator.messages().is_empty());
        }
    }
});
