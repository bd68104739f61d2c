//! Declarative field validation for Sieve
//!
//! Rules are declared per field as compact strings such as
//! `"required|string|min:3"`, evaluated against a JSON-like input mapping,
//! and every failed rule produces a human-readable message.
//!
//! # Examples
//!
//! ## Basic Validation
//!
//! ```
//! use sieve_validation::{RuleCatalog, Validator};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(RuleCatalog::new());
//! let mut validator = Validator::from_value(
//!     catalog,
//!     json!({
//!         "user": {"name": "John", "email": "john@example.com"},
//!         "password": "secret",
//!         "password_confirmation": "secret",
//!     }),
//!     [
//!         ("user.name", "required|string|min:3|max:20"),
//!         ("user.email", "required|email"),
//!         ("password_confirmation", "confirm:password"),
//!     ],
//! )
//! .unwrap();
//!
//! assert!(validator.validate().unwrap());
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use sieve_validation::{RuleCatalog, Validator};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! // Register once at start-up, then share the catalog
//! let catalog = Arc::new(RuleCatalog::new().with_extension(
//!     "even",
//!     |_field, value, _parameters, _ctx| value.as_i64().is_some_and(|n| n % 2 == 0),
//!     false,
//! ));
//!
//! let mut validator =
//!     Validator::from_value(catalog, json!({"count": 3}), [("count", "integer|even")]).unwrap();
//!
//! assert!(!validator.validate().unwrap());
//! assert_eq!(validator.messages().first("count"), Some("count field check failed"));
//! ```
//!
//! ## Absent Fields
//!
//! Only force rules (`required` and its variants, plus extensions registered
//! as forced) run on fields missing from the input:
//!
//! ```
//! use sieve_validation::{RuleCatalog, Validator};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut validator = Validator::from_value(
//!     Arc::new(RuleCatalog::new()),
//!     json!({}),
//!     [("nickname", "string|min:3"), ("email", "required_with:nickname|email")],
//! )
//! .unwrap();
//!
//! assert!(validator.validate().unwrap());
//! ```

mod catalog;
mod coerce;
mod context;
mod error;
mod messages;
mod parser;
mod rules;
mod validator;

pub use catalog::{RuleCatalog, RuleRef};
pub use context::{InputData, ValidationContext, get_field, has_field, resolve};
pub use error::{Error, Result};
pub use messages::{CatalogFormat, MESSAGES_ENV, MessageCatalog, interpolate};
pub use parser::{
    NameCache, RuleGroup, RuleSet, normalize_rule_name, parse_rule_set, parse_rules, split_rule,
};
pub use rules::{BuiltinRule, FnRule, Rule, compute_size};
pub use validator::{FailureSet, Validator};
