//! Configuration and programming errors.
//!
//! A field failing a rule is *not* an error; those outcomes are collected in the
//! [`FailureSet`](crate::FailureSet). The variants here describe a broken rule
//! specification or message catalog and abort the validation run.

use thiserror::Error;

/// Result type for validator setup and evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a broken rule specification or catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// A field references a rule that is neither registered nor built in.
    #[error("Unknown rule `{rule}` declared on field `{field}`")]
    UnknownRule { field: String, rule: String },

    /// A rule was invoked without a parameter it requires.
    #[error("Rule `{rule}` requires a parameter at position {index}")]
    MissingParameter { rule: String, index: usize },

    /// A rule parameter could not be interpreted.
    #[error("Invalid parameter `{parameter}` for rule `{rule}`: {reason}")]
    InvalidParameter {
        rule: String,
        parameter: String,
        reason: String,
    },

    /// A `regex` rule carries a pattern that does not compile.
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A message template needs more arguments than the rule has parameters.
    #[error("Template for `{rule}` has {placeholders} placeholders but only {supplied} arguments")]
    Template {
        rule: String,
        placeholders: usize,
        supplied: usize,
    },

    /// Input data was not a JSON object.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The message catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(
        rule: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            rule: rule.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the rule specification itself.
    pub fn is_rule_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownRule { .. }
                | Error::MissingParameter { .. }
                | Error::InvalidParameter { .. }
                | Error::InvalidPattern { .. }
        )
    }
}
