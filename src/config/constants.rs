//! Configuration constants.
//!
//! This module defines the constants used throughout the parser, the value
//! types and the DNS/GeoIP collaborators.

/// Token standing for an absent field value in a data line
pub const NULL_TOKEN: &str = "-";

/// `#Version` values this parser understands
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

// Hostname grammar limits (RFC 1035)
/// Maximum total length of a hostname in characters
pub const MAX_HOSTNAME_LENGTH: usize = 255;
/// Maximum length of a single dot-separated hostname label
pub const MAX_LABEL_LENGTH: usize = 63;

/// Characters rejected in a filename regardless of platform
pub const INVALID_FILENAME_CHARS: &[char] = &['<', '>', '"', '|', '?', '*', '\0'];

// Network operation timeouts
/// DNS query timeout in seconds
/// Enrichment is lazy and synchronous, so a slow name server stalls the row
/// consumer; keep this short.
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// DNS query attempts before giving up
pub const DNS_ATTEMPTS: usize = 2;

/// Reserved top-level domain that never resolves (RFC 6761)
pub const INVALID_TLD: &str = "invalid";

/// Rendering of a null value in CSV output
pub const CSV_NULL: &str = "";

// Suffixes of the enrichment columns added after each address column
/// Reverse DNS name
pub const HOSTNAME_COLUMN_SUFFIX: &str = "_hostname";
pub const COUNTRY_COLUMN_SUFFIX: &str = "_country";
pub const REGION_COLUMN_SUFFIX: &str = "_region";
pub const CITY_COLUMN_SUFFIX: &str = "_city";
pub const LONGITUDE_COLUMN_SUFFIX: &str = "_longitude";
pub const LATITUDE_COLUMN_SUFFIX: &str = "_latitude";
