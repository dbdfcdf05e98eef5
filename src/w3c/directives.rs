//! Directive line grammar.
//!
//! A directive is `# <name> [: <value>]`, whitespace-insensitive around the
//! name and colon, with the name matched case-insensitively.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config::SUPPORTED_VERSIONS;
use crate::error_handling::W3CError;
use crate::parse::{compile_regex_unsafe, datetime_parse};

const DIRECTIVE_PATTERN: &str = r"^#\s*(?P<name>[A-Za-z][A-Za-z0-9-]*)\s*(?::\s*(?P<value>.*?))?\s*$";
const VERSION_PATTERN: &str = r"^\d+\.\d+$";
// `name`, `prefix-name` or `prefix(header)`; MS uses `-` inside names so the
// prefix cannot be told apart from the name here
const FIELD_PATTERN: &str = r"^[^\s()]+(?:\([^\s()]+\))?$";

static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(DIRECTIVE_PATTERN, "DIRECTIVE_RE"));
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(VERSION_PATTERN, "VERSION_RE"));
static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(FIELD_PATTERN, "FIELD_RE"));

/// A recognized, validated directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Software(String),
    Version(String),
    Date(NaiveDateTime),
    StartDate(NaiveDateTime),
    EndDate(NaiveDateTime),
    Remark(String),
    Fields(Vec<String>),
}

fn timestamp(name: &str, value: &str, line: usize) -> Result<NaiveDateTime, W3CError> {
    match datetime_parse(value) {
        Ok(Some(ts)) => Ok(ts),
        _ => Err(W3CError::directive(
            format!("Invalid timestamp {value:?} in #{name} directive"),
            Some(line),
        )),
    }
}

fn version(value: &str, line: usize) -> Result<String, W3CError> {
    if !VERSION_RE.is_match(value) {
        return Err(W3CError::version(
            format!("Invalid version {value:?}"),
            Some(line),
        ));
    }
    if !SUPPORTED_VERSIONS.contains(&value) {
        return Err(W3CError::version(
            format!("Unsupported version {value:?}"),
            Some(line),
        ));
    }
    Ok(value.to_string())
}

fn fields(value: &str, line: usize) -> Result<Vec<String>, W3CError> {
    let identifiers: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if identifiers.is_empty() {
        return Err(W3CError::fields("Empty #Fields directive", Some(line)));
    }
    if let Some(bad) = identifiers.iter().find(|id| !FIELD_RE.is_match(id)) {
        return Err(W3CError::fields(
            format!("Invalid field identifier {bad:?}"),
            Some(line),
        ));
    }
    Ok(identifiers)
}

/// Parses one `#` line.
///
/// Returns `None` when the line does not follow the directive grammar at all,
/// leaving the caller to decide whether that is fatal. Unknown names and bad
/// values of known directives are errors.
pub fn parse_directive(line: &str, line_no: usize) -> Option<Result<Directive, W3CError>> {
    let caps = DIRECTIVE_RE.captures(line)?;
    let name = caps.name("name")?.as_str();
    let value = caps.name("value").map_or("", |m| m.as_str());

    let directive = match name.to_ascii_lowercase().as_str() {
        "software" => Ok(Directive::Software(value.to_string())),
        "remark" => Ok(Directive::Remark(value.to_string())),
        "version" => version(value, line_no).map(Directive::Version),
        "date" => timestamp(name, value, line_no).map(Directive::Date),
        "start-date" => timestamp(name, value, line_no).map(Directive::StartDate),
        "end-date" => timestamp(name, value, line_no).map(Directive::EndDate),
        "fields" => fields(value, line_no).map(Directive::Fields),
        _ => Err(W3CError::directive(
            format!("Unrecognized directive #{name}"),
            Some(line_no),
        )),
    };
    Some(directive)
}
