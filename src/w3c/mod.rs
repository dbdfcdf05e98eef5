//! W3C Extended Log Format parsing engine.
//!
//! A log file is a run of `#` directive lines followed by whitespace-separated
//! data lines:
//!
//! ```text
//! #Software: Microsoft Internet Information Services 6.0
//! #Version: 1.0
//! #Date: 2002-05-24 20:18:01
//! #Fields: date time c-ip cs-method cs-uri-stem sc-status
//! 2002-05-24 20:18:01 172.224.24.114 GET /Default.htm 200
//! ```
//!
//! [`W3CSource`] resolves the header into a [`Header`] and a [`Schema`], then
//! decodes each data line into a [`Row`]. Header violations are fatal
//! ([`W3CError`]); bad data lines are dropped with a [`DataWarning`] sent to
//! the source's [`WarningSink`].
//!
//! [`DataWarning`]: crate::error_handling::DataWarning
//! [`WarningSink`]: crate::error_handling::WarningSink
//! [`W3CError`]: crate::error_handling::W3CError

mod directives;
mod row;
mod sanitize;
mod schema;
mod source;

// Re-export public API
pub use directives::{parse_directive, Directive};
pub use row::Row;
pub use sanitize::{field_name, sanitize_name};
pub use schema::{FieldSpec, LiteralKind, Schema};
pub use source::{Header, InMemoryLines, ReaderLines, W3CSource};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
