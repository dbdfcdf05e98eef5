//! Six-component URL split the way access logs write them.

use std::fmt;

use crate::error_handling::ValueError;

/// A URL split into `scheme://authority/path;params?query#fragment`.
///
/// Almost any string is a valid `Url`: text without scheme or authority
/// markers is kept entirely as the path. The authority is kept as written
/// (host and optional port are not parsed further).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Url {
    scheme: String,
    authority: String,
    path: String,
    params: String,
    query: String,
    fragment: String,
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Splits `;params` off the last path segment.
fn split_params(path: &str) -> (&str, &str) {
    let last_segment = path.rfind('/').unwrap_or(0);
    match path[last_segment..].find(';') {
        Some(i) => (&path[..last_segment + i], &path[last_segment + i + 1..]),
        None => (path, ""),
    }
}

impl Url {
    /// Splits `raw` into its six components.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Url`] when the authority opens an IPv6 bracket
    /// without closing it (or the reverse).
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let mut rest = raw;

        let mut scheme = String::new();
        if let Some((candidate, _)) = raw.split_once("://") {
            if is_scheme(candidate) {
                scheme = candidate.to_ascii_lowercase();
                // Keep the "//" authority marker for the branch below.
                rest = &raw[candidate.len() + 1..];
            }
        }

        let mut authority = "";
        if let Some(tail) = rest.strip_prefix("//") {
            let end = tail.find(['/', '?', '#']).unwrap_or(tail.len());
            authority = &tail[..end];
            rest = &tail[end..];
            if authority.contains('[') != authority.contains(']') {
                return Err(ValueError::Url(raw.to_string()));
            }
        }

        let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
        let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));
        let (path, params) = split_params(rest);

        Ok(Self {
            scheme,
            authority: authority.to_string(),
            path: path.to_string(),
            params: params.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
        })
    }

    /// Builds a `Url` directly from its components.
    pub fn from_parts(
        scheme: &str,
        authority: &str,
        path: &str,
        params: &str,
        query: &str,
        fragment: &str,
    ) -> Self {
        Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            path: path.to_string(),
            params: params.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.authority.is_empty() || !self.scheme.is_empty() {
            write!(f, "//{}", self.authority)?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)?;
        if !self.params.is_empty() {
            write!(f, ";{}", self.params)?;
        }
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}
