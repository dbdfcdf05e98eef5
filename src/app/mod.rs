//! Main application modules.
//!
//! Statistics reporting used at the end of an export run.

pub mod statistics;

// Re-export public API
pub use statistics::{print_export_summary, print_warning_statistics};
