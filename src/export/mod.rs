//! Export functionality for parsed W3C logs.
//!
//! This module writes the rows of a [`W3CSource`](crate::w3c::W3CSource) to
//! CSV or JSON Lines, optionally adding reverse-DNS and GeoIP columns after
//! every address column.

mod csv;
mod jsonl;
mod output;
mod row;
mod types;

pub use self::csv::{write_csv, write_csv_to};
pub use self::jsonl::{write_jsonl, write_jsonl_to};
pub use self::types::{ExportFormat, ExportOptions};
