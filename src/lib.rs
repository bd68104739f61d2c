// Sieve - declarative field validation driven by compact rule strings
//
// This library re-exports the validation engine and the JSON value type its
// input is expressed in.

// Re-export the engine
#[cfg(feature = "validation")]
pub use sieve_validation;

#[cfg(feature = "validation")]
pub use sieve_validation::{
    Error, FailureSet, MessageCatalog, Result, Rule, RuleCatalog, ValidationContext, Validator,
};

pub use serde_json::{Value, json};

/// Prelude for common imports
///
/// ```
/// use sieve::prelude::*;
///
/// let catalog = std::sync::Arc::new(RuleCatalog::new());
/// let mut validator = Validator::from_value(catalog, json!({"age": 30}), [("age", "integer|min:18")])?;
/// assert!(validator.validate()?);
/// # Ok::<(), sieve::Error>(())
/// ```
pub mod prelude {
    #[cfg(feature = "validation")]
    pub use sieve_validation::{
        Error, FailureSet, MessageCatalog, Rule, RuleCatalog, ValidationContext, Validator,
    };

    pub use serde_json::{Value, json};
}
