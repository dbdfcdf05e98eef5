//! Error handling and warning statistics.
//!
//! Two disjoint severities:
//! - **Fatal errors** ([`W3CError`]): header violations that make a source unusable
//! - **Data warnings** ([`DataWarning`]): one dropped line, iteration continues
//!
//! [`ValueError`] is the local validation failure of a literal or value type.

mod stats;
mod types;

// Re-export public API
pub use stats::{LogWarnings, WarningSink, WarningStats};
pub use types::{DataWarning, InitializationError, ValueError, W3CError, WarningKind};
