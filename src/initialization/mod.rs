//! Application initialization.
//!
//! Logger setup for the command-line tool. The DNS resolver and the GeoIP
//! databases initialize themselves lazily (see [`crate::dns`] and
//! [`crate::geoip`]).

mod logger;

// Re-export public API
pub use logger::init_logger_with;
