// Date rules

use super::param;
use crate::{Error, Result};
use chrono::format::{Item, Parsed, StrftimeItems};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date or timestamp in one of the accepted notations.
///
/// Besides the fixed formats this understands RFC 3339, RFC 2822, `@<unix
/// seconds>` and the keywords `now`, `today`, `tomorrow` and `yesterday`
/// (all UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let midnight = || Utc::now().date_naive().and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    match text.to_ascii_lowercase().as_str() {
        "now" => return Some(Utc::now()),
        "today" => return midnight(),
        "tomorrow" => return midnight().and_then(|t| t.checked_add_days(Days::new(1))),
        "yesterday" => return midnight().and_then(|t| t.checked_sub_days(Days::new(1))),
        _ => {}
    }

    if let Some(seconds) = text.strip_prefix('@') {
        return seconds
            .parse::<i64>()
            .ok()
            .and_then(|s| DateTime::from_timestamp(s, 0));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// The whole parameter list as one string; commas in formats and dates were
/// split off as separate parameters.
fn joined_param(rule: &str, parameters: &[String]) -> Result<String> {
    param(rule, parameters, 0)?;
    Ok(parameters.join(","))
}

fn timestamp_of(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp)
}

pub(super) fn date(value: &Value) -> bool {
    timestamp_of(value).is_some()
}

/// The value matches a strftime-style format exactly.
pub(super) fn date_format(rule: &str, value: &Value, parameters: &[String]) -> Result<bool> {
    let format = joined_param(rule, parameters)?;
    let format = format.as_str();
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::invalid_parameter(rule, format, "invalid date format"));
    }

    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    let mut parsed = Parsed::new();
    Ok(chrono::format::parse(&mut parsed, text, StrftimeItems::new(format)).is_ok())
}

pub(super) fn date_before(rule: &str, value: &Value, parameters: &[String]) -> Result<bool> {
    let other = joined_param(rule, parameters)?;
    Ok(match (timestamp_of(value), parse_timestamp(&other)) {
        (Some(value), Some(other)) => value < other,
        _ => false,
    })
}

pub(super) fn date_after(rule: &str, value: &Value, parameters: &[String]) -> Result<bool> {
    let other = joined_param(rule, parameters)?;
    Ok(match (timestamp_of(value), parse_timestamp(&other)) {
        (Some(value), Some(other)) => value > other,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_timestamp_notations() {
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp("2024/01/15").is_some());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_some());
        assert!(parse_timestamp("2024-01-15T10:30:00Z").is_some());
        assert!(parse_timestamp("Mon, 15 Jan 2024 10:30:00 +0000").is_some());
        assert!(parse_timestamp("@1700000000").is_some());
        assert!(parse_timestamp("today").is_some());
        assert!(parse_timestamp("Tomorrow").is_some());
        assert!(parse_timestamp("2024-13-45").is_none());
        assert!(parse_timestamp("someday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_keywords_are_ordered() {
        let yesterday = parse_timestamp("yesterday").unwrap();
        let today = parse_timestamp("today").unwrap();
        let tomorrow = parse_timestamp("tomorrow").unwrap();
        assert!(yesterday < today && today < tomorrow);
    }

    #[test]
    fn test_date() {
        assert!(date(&json!("2024-02-29")));
        assert!(!date(&json!("2023-02-29")));
        assert!(!date(&json!(20240101)));
    }

    #[test]
    fn test_date_format() {
        let p = params(&["%Y-%m-%d"]);
        assert!(date_format("DateFormat", &json!("2024-01-15"), &p).unwrap());
        assert!(!date_format("DateFormat", &json!("15/01/2024"), &p).unwrap());
        assert!(!date_format("DateFormat", &json!("2024-01-15 10:00"), &p).unwrap());

        let p = params(&["%H:%M"]);
        assert!(date_format("DateFormat", &json!("10:30"), &p).unwrap());

        // "%b %d, %Y" arrives split at the comma
        let p = params(&["%b %d", " %Y"]);
        assert!(date_format("DateFormat", &json!("Jan 05, 2024"), &p).unwrap());

        let p = params(&["%Q"]);
        assert!(matches!(
            date_format("DateFormat", &json!("x"), &p),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_date_before_after() {
        let p = params(&["2024-06-01"]);
        assert!(date_before("DateBefore", &json!("2024-05-31"), &p).unwrap());
        assert!(!date_before("DateBefore", &json!("2024-06-01"), &p).unwrap());
        assert!(date_after("DateAfter", &json!("2024-06-01 00:00:01"), &p).unwrap());
        assert!(!date_after("DateAfter", &json!("garbage"), &p).unwrap());
        assert!(date_after("DateAfter", &json!("tomorrow"), &params(&["today"])).unwrap());

        let p = params(&["Mon", " 15 Jan 2024 10:30:00 +0000"]);
        assert!(date_before("DateBefore", &json!("2024-01-14"), &p).unwrap());
        assert!(!date_before("DateBefore", &json!("2024-01-16"), &p).unwrap());
    }
}
