// Format and comparison rules

use super::param;
use crate::coerce::{loose_eq, string_form};
use crate::{Error, Result, ValidationContext};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::net::IpAddr;
use url::Url;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

/// Compiled `regex` rule patterns, keyed by the raw parameter text.
static PATTERNS: Lazy<DashMap<String, Regex>> = Lazy::new(DashMap::new);

/// Upper bound on cached patterns; the cache is emptied when it is reached.
const PATTERN_CACHE_LIMIT: usize = 512;

/// Delimiters accepted around a `/pattern/flags` style expression.
const DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%'];

/// Flags accepted after a closing delimiter. `u` and `D` have no effect.
const FLAGS: &[char] = &['i', 'm', 's', 'x', 'U', 'u', 'D'];

/// The other field is set and loosely differs from this value.
pub(super) fn different(
    rule: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let other = param(rule, parameters, 0)?;
    Ok(ctx.is_set(other) && !loose_eq(value, ctx.get_field(other)))
}

/// The value is strictly equal to the other field's value.
pub(super) fn confirm(
    rule: &str,
    value: &Value,
    parameters: &[String],
    ctx: &ValidationContext<'_>,
) -> Result<bool> {
    let other = param(rule, parameters, 0)?;
    Ok(value == ctx.get_field(other))
}

pub(super) fn matches_pattern(value: &Value, parameters: &[String]) -> Result<bool> {
    if parameters.is_empty() {
        return Err(Error::MissingParameter {
            rule: "Regex".to_string(),
            index: 0,
        });
    }

    // Commas inside the pattern were split off as separate parameters.
    let raw = parameters.join(",");
    let pattern = cached_pattern(&raw)?;

    Ok(string_form(value).is_some_and(|s| pattern.is_match(&s)))
}

fn cached_pattern(raw: &str) -> Result<Regex> {
    if let Some(pattern) = PATTERNS.get(raw) {
        return Ok(pattern.clone());
    }

    let pattern = compile_pattern(raw)?;
    if PATTERNS.len() >= PATTERN_CACHE_LIMIT {
        PATTERNS.clear();
    }
    PATTERNS.insert(raw.to_string(), pattern.clone());
    Ok(pattern)
}

/// Compile a bare pattern or a delimited `/pattern/flags` expression.
pub(crate) fn compile_pattern(raw: &str) -> Result<Regex> {
    let source = match split_delimited(raw) {
        Some((body, "")) => body.to_string(),
        Some((body, flags)) => {
            let inline: String = flags.chars().filter(|&flag| !matches!(flag, 'u' | 'D')).collect();
            if inline.is_empty() {
                body.to_string()
            } else {
                format!("(?{}){}", inline, body)
            }
        }
        None => raw.to_string(),
    };

    Regex::new(&source).map_err(|source| Error::InvalidPattern {
        pattern: raw.to_string(),
        source,
    })
}

/// Split `/body/flags`. Text after the closing delimiter that is not made of
/// known flags means the expression is a bare pattern, e.g. `/api/users`.
fn split_delimited(raw: &str) -> Option<(&str, &str)> {
    let delimiter = raw.chars().next().filter(|c| DELIMITERS.contains(c))?;
    let end = raw.rfind(delimiter).filter(|&end| end > 0)?;
    let flags = &raw[end + 1..];
    if !flags.chars().all(|c| FLAGS.contains(&c)) {
        return None;
    }
    Some((&raw[1..end], flags))
}

/// A string value equal to one of the options.
pub(super) fn one_of(value: &Value, options: &[String]) -> bool {
    value
        .as_str()
        .is_some_and(|s| options.iter().any(|option| option == s))
}

pub(super) fn valid_url(value: &Value) -> bool {
    value
        .as_str()
        .and_then(|s| Url::parse(s).ok())
        .is_some_and(|url| url.has_host() || matches!(url.scheme(), "mailto" | "news" | "file"))
}

pub(super) fn valid_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

pub(super) fn valid_ip(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.parse::<IpAddr>().is_ok())
}
