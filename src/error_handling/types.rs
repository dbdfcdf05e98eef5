//! Error type definitions.
//!
//! This module defines the fatal header errors, the recoverable per-line data
//! warnings and the local validation errors raised by the value types.

use std::fmt;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Local validation failure of a literal or value type.
///
/// Raised at the point of construction. The row decoder converts these into
/// [`DataWarning`]s when they occur while converting a field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid integer: {0:?}")]
    Integer(String),

    #[error("invalid fixed-point number: {0:?}")]
    Fixed(String),

    #[error("invalid date (expected YYYY-MM-DD): {0:?}")]
    Date(String),

    #[error("invalid time (expected HH:MM:SS): {0:?}")]
    Time(String),

    #[error("invalid timestamp (expected YYYY-MM-DD HH:MM:SS): {0:?}")]
    DateTime(String),

    #[error("invalid hostname {name:?}: {reason}")]
    Hostname { name: String, reason: &'static str },

    #[error("invalid URL: {0:?}")]
    Url(String),

    #[error("invalid address: {0:?}")]
    Address(String),

    #[error("port out of range in {0:?}")]
    Port(String),

    #[error("invalid character {ch:?} in filename {path:?}")]
    Filename { path: String, ch: char },

    #[error("field name must not be empty")]
    EmptyFieldName,
}

/// Fatal structural error; the source that raised it is unusable.
#[derive(Error, Debug)]
pub enum W3CError {
    /// Missing, duplicated, malformed or unsupported `#Version`.
    #[error("{}", with_line(.line, .message))]
    Version {
        message: String,
        line: Option<usize>,
    },

    /// Missing or duplicated `#Fields`, or an invalid field list.
    #[error("{}", with_line(.line, .message))]
    Fields {
        message: String,
        line: Option<usize>,
    },

    /// Unrecognized or malformed directive.
    #[error("{}", with_line(.line, .message))]
    Directive {
        message: String,
        line: Option<usize>,
    },

    /// The underlying line input failed.
    #[error("Failed to read log input: {0}")]
    Io(#[from] std::io::Error),

    /// The header was requested from a source that already closed without one.
    #[error("Source closed before its header was read")]
    Closed,
}

fn with_line(line: &Option<usize>, message: &str) -> String {
    match line {
        Some(line) => format!("Line {line}: {message}"),
        None => message.to_string(),
    }
}

impl W3CError {
    pub fn version(message: impl Into<String>, line: Option<usize>) -> Self {
        W3CError::Version {
            message: message.into(),
            line,
        }
    }

    pub fn fields(message: impl Into<String>, line: Option<usize>) -> Self {
        W3CError::Fields {
            message: message.into(),
            line,
        }
    }

    pub fn directive(message: impl Into<String>, line: Option<usize>) -> Self {
        W3CError::Directive {
            message: message.into(),
            line,
        }
    }

    /// Line number the error was raised at, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            W3CError::Version { line, .. }
            | W3CError::Fields { line, .. }
            | W3CError::Directive { line, .. } => *line,
            W3CError::Io(_) | W3CError::Closed => None,
        }
    }
}

/// Category of a recoverable data warning; each one drops its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningKind {
    /// Token count differs from the number of declared fields
    FieldCount,
    /// A token failed its field's literal parser
    Conversion,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::FieldCount => "Field count mismatch",
            WarningKind::Conversion => "Field conversion failure",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dropped data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataWarning {
    /// 1-based line number of the dropped line
    pub line: usize,
    pub kind: WarningKind,
    pub message: String,
}

impl DataWarning {
    pub fn new(line: usize, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_w3c_error_with_line() {
        let exc = W3CError::directive("Something went wrong!", Some(23));
        assert_eq!(exc.to_string(), "Line 23: Something went wrong!");
        assert_eq!(exc.line(), Some(23));
    }

    #[test]
    fn test_w3c_error_without_line() {
        let exc = W3CError::fields("Something else went wrong!", None);
        assert_eq!(exc.to_string(), "Something else went wrong!");
        assert_eq!(exc.line(), None);
    }

    #[test]
    fn test_io_error_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let exc = W3CError::from(io);
        assert!(exc.to_string().contains("Failed to read log input"));
        assert_eq!(exc.line(), None);
    }

    #[test]
    fn test_data_warning_display() {
        let warning = DataWarning::new(4, WarningKind::Conversion, "invalid address: \"foo\"");
        assert_eq!(warning.to_string(), "Line 4: invalid address: \"foo\"");
    }

    #[test]
    fn test_value_error_messages() {
        let err = ValueError::Hostname {
            name: "foo.".into(),
            reason: "empty label",
        };
        assert_eq!(err.to_string(), "invalid hostname \"foo.\": empty label");
        assert_eq!(
            ValueError::Port("127.0.0.1:100000".into()).to_string(),
            "port out of range in \"127.0.0.1:100000\""
        );
    }
}
