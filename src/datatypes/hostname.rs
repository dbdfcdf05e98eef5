//! Validated DNS names.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::config::{MAX_HOSTNAME_LENGTH, MAX_LABEL_LENGTH};
use crate::dns;
use crate::error_handling::ValueError;

use super::Address;

/// A DNS name that passed label validation.
///
/// The name is kept as written. Equality and hashing ignore ASCII case, as
/// DNS does. The forward lookup behind [`Hostname::address`] happens on first
/// access and its outcome (including "no mapping") is cached in the value.
#[derive(Clone)]
pub struct Hostname {
    name: String,
    address: OnceLock<Option<Box<Address>>>,
}

fn invalid(name: &str, reason: &'static str) -> ValueError {
    ValueError::Hostname {
        name: name.to_string(),
        reason,
    }
}

fn validate(name: &str) -> Result<(), ValueError> {
    if name.len() > MAX_HOSTNAME_LENGTH {
        return Err(invalid(name, "longer than 255 characters"));
    }
    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid(name, "empty label"));
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(invalid(name, "label longer than 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid(name, "label starts or ends with a hyphen"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid(name, "invalid character"));
        }
    }
    Ok(())
}

impl Hostname {
    /// Validates `name` without resolving it.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Hostname`] when the name is longer than 255
    /// characters, has an empty label (leading, trailing or doubled dot), a
    /// label longer than 63 characters, a label with a leading or trailing
    /// hyphen, or a character outside `[A-Za-z0-9-]`.
    pub fn parse(name: &str) -> Result<Self, ValueError> {
        validate(name)?;
        Ok(Self {
            name: name.to_string(),
            address: OnceLock::new(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The first address `name` resolves to, or `None` when there is no mapping.
    pub fn address(&self) -> Option<&Address> {
        self.address
            .get_or_init(|| dns::resolve_forward(&self.name).map(|ip| Box::new(Address::from(ip))))
            .as_deref()
    }
}

impl PartialEq for Hostname {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Hostname {}

impl Hash for Hostname {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.name.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Debug for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hostname").field(&self.name).finish()
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for Hostname {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
