//! Literal parsers for W3C log tokens.
//!
//! One function per literal kind:
//! - Numbers: [`int_parse`], [`fixed_parse`]
//! - Timestamps: [`date_parse`], [`time_parse`], [`datetime_parse`]
//! - Text: [`string_parse`] (percent/`+` decoding and quote unwrapping)
//! - Structured: [`url_parse`], [`name_parse`], [`address_parse`]
//!
//! The placeholder token `-` parses to `None` everywhere.

mod literals;

use regex::Regex;

// Re-export public API
pub use literals::{
    address_parse, date_parse, datetime_parse, fixed_parse, int_parse, name_parse, string_parse,
    time_parse, url_parse,
};

/// Helper function to compile a static regex pattern, panicking with a detailed
/// error message if compilation fails. Only used for compile-time constant patterns.
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}
