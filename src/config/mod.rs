//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (grammar limits, timeouts, rendering)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ExportFormat, LogFormat, LogLevel, Opt};
