//! Token parsers.
//!
//! Every parser maps the placeholder `-` to `Ok(None)`, a well-formed token to
//! `Ok(Some(value))` and anything else to a [`ValueError`]. None performs I/O.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::NULL_TOKEN;
use crate::datatypes::{Address, Hostname, Url};
use crate::error_handling::ValueError;

use super::compile_regex_unsafe;

// Token grammars; chrono does the calendar validation afterwards
const INTEGER_PATTERN: &str = r"^-?\d+$";
const FIXED_PATTERN: &str = r"^-?\d+(\.\d*)?$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const TIME_PATTERN: &str = r"^\d{2}:\d{2}:[0-5]\d$";
const DATETIME_PATTERN: &str = r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:[0-5]\d$";

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(INTEGER_PATTERN, "INTEGER_RE"));
static FIXED_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(FIXED_PATTERN, "FIXED_RE"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(DATE_PATTERN, "DATE_RE"));
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(TIME_PATTERN, "TIME_RE"));
static DATETIME_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(DATETIME_PATTERN, "DATETIME_RE"));

fn is_null(token: &str) -> bool {
    token == NULL_TOKEN
}

/// `+` becomes a space, then `%XX` escapes are decoded. Invalid escapes and
/// invalid UTF-8 are kept (the latter as U+FFFD).
pub(crate) fn percent_decode(token: &str) -> String {
    let plus_decoded: Cow<'_, str> = if token.contains('+') {
        Cow::Owned(token.replace('+', " "))
    } else {
        Cow::Borrowed(token)
    };
    let bytes = urlencoding::decode_binary(plus_decoded.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Strips one pair of surrounding quotes and collapses `""` escapes inside.
fn unquote(decoded: String) -> String {
    if decoded.len() >= 2 && decoded.starts_with('"') && decoded.ends_with('"') {
        decoded[1..decoded.len() - 1].replace("\"\"", "\"")
    } else {
        decoded
    }
}

/// Optional sign and digits.
pub fn int_parse(token: &str) -> Result<Option<i64>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    if !INTEGER_RE.is_match(token) {
        return Err(ValueError::Integer(token.to_string()));
    }
    token
        .parse()
        .map(Some)
        .map_err(|_| ValueError::Integer(token.to_string()))
}

/// Optional sign, digits, optional point and fraction (`0.` is valid).
pub fn fixed_parse(token: &str) -> Result<Option<f64>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    if !FIXED_RE.is_match(token) {
        return Err(ValueError::Fixed(token.to_string()));
    }
    token
        .trim_end_matches('.')
        .parse()
        .map(Some)
        .map_err(|_| ValueError::Fixed(token.to_string()))
}

/// Strict `YYYY-MM-DD`.
pub fn date_parse(token: &str) -> Result<Option<NaiveDate>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    if !DATE_RE.is_match(token) {
        return Err(ValueError::Date(token.to_string()));
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValueError::Date(token.to_string()))
}

/// Strict 24-hour `HH:MM:SS`.
pub fn time_parse(token: &str) -> Result<Option<NaiveTime>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    if !TIME_RE.is_match(token) {
        return Err(ValueError::Time(token.to_string()));
    }
    NaiveTime::parse_from_str(token, "%H:%M:%S")
        .map(Some)
        .map_err(|_| ValueError::Time(token.to_string()))
}

/// Strict `YYYY-MM-DD HH:MM:SS`, as used by the timestamp directives.
pub fn datetime_parse(value: &str) -> Result<Option<NaiveDateTime>, ValueError> {
    if is_null(value) {
        return Ok(None);
    }
    if !DATETIME_RE.is_match(value) {
        return Err(ValueError::DateTime(value.to_string()));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(Some)
        .map_err(|_| ValueError::DateTime(value.to_string()))
}

/// Percent/`+` decoding followed by quote unwrapping.
///
/// A token wrapped in double quotes loses the outer pair and every doubled
/// quote inside collapses to one, so `"""foo"""` gives `"foo"` and `""`
/// gives the empty string.
pub fn string_parse(token: &str) -> Result<Option<String>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    Ok(Some(unquote(percent_decode(token))))
}

/// Percent/`+` decoding followed by [`Url::parse`].
pub fn url_parse(token: &str) -> Result<Option<Url>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    Url::parse(&percent_decode(token)).map(Some)
}

/// Hostname validation; nothing is resolved.
pub fn name_parse(token: &str) -> Result<Option<Hostname>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    Hostname::parse(token).map(Some)
}

/// Address parsing; nothing is looked up.
pub fn address_parse(token: &str) -> Result<Option<Address>, ValueError> {
    if is_null(token) {
        return Ok(None);
    }
    Address::parse(token).map(Some)
}
