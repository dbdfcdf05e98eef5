//! Value types for log fields.
//!
//! - [`Url`]: six-component URL, accepts almost any string
//! - [`Hostname`]: validated DNS name with lazy forward resolution
//! - [`Address`]: IPv4/IPv6 with optional port, lazy reverse DNS and GeoIP facts
//! - [`Filename`]: path with filesystem-derived properties
//! - [`Value`]: the tagged value a row holds for each non-null field
//!
//! Construction validates; enrichment happens on first access and is cached
//! per value in a write-once cell.

mod address;
mod filename;
mod hostname;
mod url;
mod value;

// Re-export public API
pub use address::{Address, AddressKind};
pub use filename::Filename;
pub use hostname::Hostname;
pub use url::Url;
pub use value::Value;
