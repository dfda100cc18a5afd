// Input validation helpers
//
// Pure functions shared by entity construction and the interactive prompts.
// Each helper either normalizes a raw string into a typed value or reports
// an InvalidValue; none of them touch stdin or the database.

use chrono::{Datelike, NaiveDate};

use crate::error::{DomainError, DomainResult};

/// Trim the input and reject empty results.
pub fn required_name(field: &'static str, raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_value(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Trim the input, mapping empty to `None`.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional non-negative integer (grams, years, meters).
pub fn optional_u32(field: &'static str, raw: &str) -> DomainResult<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| DomainError::invalid_value(field, format!("not a non-negative integer: {raw}")))
}

/// Parse a count that must be at least 1.
pub fn positive_count(field: &'static str, raw: &str) -> DomainResult<u32> {
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| DomainError::invalid_value(field, format!("not a whole number: {raw}")))?;
    if value == 0 {
        return Err(DomainError::invalid_value(field, "must be at least 1"));
    }
    Ok(value)
}

/// Parse a signed gram amount (mass corrections may be negative).
pub fn signed_grams(field: &'static str, raw: &str) -> DomainResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::invalid_value(field, format!("not an integer: {raw}")))
}

/// Interpret yes/no style input. Unrecognized input yields `None` so prompt
/// loops can retry.
pub fn yes_no(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parse a calendar date in any of the supported formats.
pub fn parse_date(field: &'static str, raw: &str) -> DomainResult<NaiveDate> {
    let trimmed = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(DomainError::invalid_value(
        field,
        format!("not a recognized date: {raw}"),
    ))
}

/// Parse a month-granularity date (`YYYY-MM` or any full date, normalized to
/// the first of the month).
pub fn parse_month(field: &'static str, raw: &str) -> DomainResult<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date(field, trimmed).map(|date| date.with_day(1).unwrap_or(date))
}

/// Loose shape check for brand URLs: http(s) scheme plus a host part.
pub fn looks_like_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("http://")
        .or_else(|| raw.strip_prefix("https://"));
    match rest {
        Some(host) => !host.is_empty() && !host.starts_with('/'),
        None => false,
    }
}
