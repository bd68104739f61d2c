//! Failure message templates.
//!
//! A [`MessageCatalog`] maps canonical rule names to templates such as
//! `"must be at least %s"`. When a rule fails, the template is filled with
//! the rule's parameters and prefixed with the field name, giving
//! `"name must be at least 3"`.

use crate::coerce::{parse_float_str, parse_int_str};
use crate::parser::normalize_rule_name;
use crate::{Error, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment variable naming a template file to overlay on the defaults.
pub const MESSAGES_ENV: &str = "SIEVE_MESSAGES";

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("Required", "is required"),
    ("RequiredWith", "is required when %s is present"),
    ("RequiredWithout", "is required alongside %s"),
    ("RequiredIf", "is required when %s has one of the given values"),
    ("RequiredUnless", "is required unless %s has one of the given values"),
    ("Different", "must be different from %s"),
    ("Confirm", "must match %s"),
    ("Accept", "must be accepted"),
    ("Boolean", "must be a boolean"),
    ("Numeric", "must be numeric"),
    ("Integer", "must be an integer"),
    ("Float", "must be a float"),
    ("String", "must be a string"),
    ("Array", "must be an array"),
    ("Size", "must have a size of %s"),
    ("Min", "must be at least %s"),
    ("Max", "may not be greater than %s"),
    ("Range", "is out of the allowed range"),
    ("Regex", "has an invalid format"),
    ("In", "must be one of the allowed values"),
    ("Url", "must be a valid URL"),
    ("Email", "must be a valid email address"),
    ("Ip", "must be a valid IP address"),
    ("Date", "must be a valid date"),
    ("DateFormat", "does not match the format %s"),
    ("DateBefore", "must be a date before %s"),
    ("DateAfter", "must be a date after %s"),
    ("Json", "must be a valid JSON string"),
];

/// Supported template file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(CatalogFormat::Json),
            "toml" => Some(CatalogFormat::Toml),
            _ => None,
        }
    }

    /// Detect the format from a file path.
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Catalog(format!("No file extension: {}", path.display())))?;

        Self::from_extension(ext)
            .ok_or_else(|| Error::Catalog(format!("Unsupported format: {}", ext)))
    }
}

/// Rule name -> message template.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    /// A catalog with no templates; every failure gets the generic message.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Build from `(rule, template)` pairs. Rule names are normalized.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            templates: pairs
                .into_iter()
                .map(|(rule, template)| (normalize_rule_name(rule.as_ref()), template.into()))
                .collect(),
        }
    }

    /// Parse a flat JSON object of templates.
    pub fn from_json(content: &str) -> Result<Self> {
        let templates: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self::from_pairs(templates))
    }

    /// Parse a flat TOML table of templates.
    pub fn from_toml(content: &str) -> Result<Self> {
        let templates: HashMap<String, String> = toml::from_str(content)?;
        Ok(Self::from_pairs(templates))
    }

    /// Load templates from a `.json` or `.toml` file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = CatalogFormat::detect(path)?;
        let content = fs::read_to_string(path)?;

        let catalog = match format {
            CatalogFormat::Json => Self::from_json(&content)?,
            CatalogFormat::Toml => Self::from_toml(&content)?,
        };
        debug!(path = %path.display(), templates = catalog.len(), "Loaded message catalog");
        Ok(catalog)
    }

    /// Defaults, overlaid with the file named by `SIEVE_MESSAGES` if set.
    pub fn from_env() -> Result<Self> {
        let mut catalog = Self::default();
        if let Ok(path) = env::var(MESSAGES_ENV) {
            catalog.merge(Self::load_file(path)?);
        }
        Ok(catalog)
    }

    /// Overlay `other` onto this catalog.
    pub fn merge(&mut self, other: MessageCatalog) {
        self.templates.extend(other.templates);
    }

    /// Set the template for a rule.
    pub fn with(mut self, rule: &str, template: impl Into<String>) -> Self {
        self.templates
            .insert(normalize_rule_name(rule), template.into());
        self
    }

    /// Template for a canonical rule name.
    pub fn get(&self, rule: &str) -> Option<&str> {
        self.templates.get(rule).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Format the failure message for `rule` on `field`.
    ///
    /// Without a template the message is `"<field> field check failed"`.
    /// A template with more placeholders than `parameters` is an error.
    pub fn build(&self, rule: &str, field: &str, parameters: &[String]) -> Result<String> {
        let Some(template) = self.get(rule) else {
            return Ok(format!("{} field check failed", field));
        };

        let body = interpolate(template, parameters).map_err(|placeholders| Error::Template {
            rule: rule.to_string(),
            placeholders,
            supplied: parameters.len(),
        })?;
        Ok(format!("{} {}", field, body))
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_TEMPLATES.iter().copied())
    }
}

/// Fill `%s`, `%d` and positional `%1$s` placeholders; `%%` is a literal `%`.
///
/// On failure returns the number of arguments the template needs.
pub fn interpolate(template: &str, args: &[String]) -> std::result::Result<String, usize> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next = 0usize;
    let mut needed = 0usize;
    let mut pieces: Vec<(usize, char)> = Vec::new();
    let mut literal = String::new();
    let mut segments: Vec<String> = Vec::new();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }

        let positional = !digits.is_empty() && chars.peek() == Some(&'$');
        if !digits.is_empty() && !positional {
            literal.push('%');
            literal.push_str(&digits);
            continue;
        }

        let index = if positional {
            chars.next();
            digits.parse::<usize>().ok().filter(|&n| n > 0).map(|n| n - 1)
        } else {
            None
        };

        match chars.peek().copied() {
            Some('%') if !positional => {
                chars.next();
                literal.push('%');
            }
            Some(spec @ ('s' | 'd')) if index.is_some() || !positional => {
                chars.next();
                let index = index.unwrap_or_else(|| {
                    next += 1;
                    next - 1
                });
                needed = needed.max(index + 1);
                segments.push(std::mem::take(&mut literal));
                pieces.push((index, spec));
            }
            _ => {
                // Not a placeholder; keep the text as written.
                literal.push('%');
                literal.push_str(&digits);
                if positional {
                    literal.push('$');
                }
            }
        }
    }

    if needed > args.len() {
        return Err(needed);
    }

    for (segment, (index, spec)) in segments.iter().zip(&pieces) {
        out.push_str(segment);
        let arg = &args[*index];
        if *spec == 'd' {
            out.push_str(&integer_argument(arg).to_string());
        } else {
            out.push_str(arg);
        }
    }
    out.push_str(&literal);
    Ok(out)
}

fn integer_argument(arg: &str) -> i64 {
    parse_int_str(arg)
        .or_else(|| parse_float_str(arg).map(|f| f.trunc() as i64))
        .unwrap_or(0)
}
