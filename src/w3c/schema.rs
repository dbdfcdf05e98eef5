//! Field table built from a `#Fields` directive.

use std::collections::HashMap;

use crate::datatypes::Value;
use crate::error_handling::{ValueError, W3CError};
use crate::parse;

use super::sanitize::field_name;

/// Direction/entity prefixes of field identifiers (client, server, remote, ...).
const FIELD_PREFIXES: &[&str] = &["cs-", "sc-", "sr-", "rs-", "c-", "s-", "r-", "x-"];

/// The literal parser a field's tokens go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Fixed,
    Date,
    Time,
    String,
    Url,
    Name,
    Address,
}

impl LiteralKind {
    /// Picks the parser for a raw field identifier.
    ///
    /// Matching happens on the base name, after the direction prefix
    /// (`c-`, `s-`, `cs-`, ...). Header-derived fields such as
    /// `cs(User-Agent)` are always strings.
    pub fn classify(identifier: &str) -> Self {
        if identifier.contains('(') {
            return LiteralKind::String;
        }
        let lowered = identifier.to_ascii_lowercase();
        let base = FIELD_PREFIXES
            .iter()
            .find_map(|prefix| lowered.strip_prefix(prefix))
            .unwrap_or(lowered.as_str());

        let is = |name: &str| base == name || base.ends_with(&format!("-{name}"));
        match base {
            "date" => LiteralKind::Date,
            "time" => LiteralKind::Time,
            "time-taken" => LiteralKind::Fixed,
            "dns" => LiteralKind::Name,
            "count" | "interval" | "substatus" => LiteralKind::Integer,
            _ if is("ip") => LiteralKind::Address,
            _ if is("port") || is("status") || is("bytes") => LiteralKind::Integer,
            _ if base.contains("uri") => LiteralKind::Url,
            _ => LiteralKind::String,
        }
    }

    /// Runs `token` through this kind's parser.
    pub fn convert(self, token: &str) -> Result<Option<Value>, ValueError> {
        Ok(match self {
            LiteralKind::Integer => parse::int_parse(token)?.map(Value::Integer),
            LiteralKind::Fixed => parse::fixed_parse(token)?.map(Value::Fixed),
            LiteralKind::Date => parse::date_parse(token)?.map(Value::Date),
            LiteralKind::Time => parse::time_parse(token)?.map(Value::Time),
            LiteralKind::String => parse::string_parse(token)?.map(Value::String),
            LiteralKind::Url => parse::url_parse(token)?.map(Value::Url),
            LiteralKind::Name => parse::name_parse(token)?.map(Value::Name),
            LiteralKind::Address => parse::address_parse(token)?.map(Value::Address),
        })
    }
}

/// One column of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Row attribute name
    pub name: String,
    /// Identifier as written in `#Fields`
    pub identifier: String,
    pub kind: LiteralKind,
}

/// Ordered field table, shared by every row of one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Builds the table for a `#Fields` identifier list.
    ///
    /// # Errors
    ///
    /// A fields error when two identifiers map to the same attribute name or
    /// an identifier is empty. `line` is attached to the error.
    pub fn from_identifiers<S: AsRef<str>>(
        identifiers: &[S],
        line: Option<usize>,
    ) -> Result<Self, W3CError> {
        let mut fields = Vec::with_capacity(identifiers.len());
        let mut index = HashMap::with_capacity(identifiers.len());
        for (position, identifier) in identifiers.iter().enumerate() {
            let identifier = identifier.as_ref();
            let name = field_name(identifier)
                .map_err(|e| W3CError::fields(e.to_string(), line))?;
            if index.insert(name.clone(), position).is_some() {
                return Err(W3CError::fields(
                    format!("Duplicate field name {name:?} (from {identifier:?})"),
                    line,
                ));
            }
            fields.push(FieldSpec {
                name,
                identifier: identifier.to_string(),
                kind: LiteralKind::classify(identifier),
            });
        }
        Ok(Self { fields, index })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Column position of an attribute name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let cases = [
            ("date", LiteralKind::Date),
            ("time", LiteralKind::Time),
            ("rs-date", LiteralKind::Date),
            ("c-ip", LiteralKind::Address),
            ("s-ip", LiteralKind::Address),
            ("cs-ip", LiteralKind::Address),
            ("s-port", LiteralKind::Integer),
            ("sc-status", LiteralKind::Integer),
            ("sc-win32-status", LiteralKind::Integer),
            ("sc-substatus", LiteralKind::Integer),
            ("sc-bytes", LiteralKind::Integer),
            ("cs-bytes", LiteralKind::Integer),
            ("time-taken", LiteralKind::Fixed),
            ("cs-uri-stem", LiteralKind::Url),
            ("cs-uri-query", LiteralKind::Url),
            ("cs-uri", LiteralKind::Url),
            ("s-dns", LiteralKind::Name),
            ("x-count", LiteralKind::Integer),
            ("interval", LiteralKind::Integer),
            ("cs-method", LiteralKind::String),
            ("cs-username", LiteralKind::String),
            ("s-sitename", LiteralKind::String),
            ("cs(User-Agent)", LiteralKind::String),
            ("cs(Referrer)", LiteralKind::String),
            ("foo(bar)", LiteralKind::String),
            ("x-unknown", LiteralKind::String),
        ];
        for (identifier, expected) in cases {
            assert_eq!(LiteralKind::classify(identifier), expected, "{identifier}");
        }
    }

    #[test]
    fn test_convert() {
        assert_eq!(LiteralKind::Integer.convert("200").unwrap(), Some(Value::Integer(200)));
        assert_eq!(LiteralKind::Fixed.convert("31").unwrap(), Some(Value::Fixed(31.0)));
        assert_eq!(LiteralKind::Address.convert("-").unwrap(), None);
        assert_eq!(
            LiteralKind::Address.convert("foo.bar"),
            Err(ValueError::Address("foo.bar".into()))
        );
    }

    #[test]
    fn test_schema_order_and_names() {
        let schema =
            Schema::from_identifiers(&["date", "c-ip", "cs(User-Agent)"], Some(4)).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            vec!["date", "c_ip", "cs_User_Agent"]
        );
        assert_eq!(schema.position("c_ip"), Some(1));
        assert_eq!(schema.position("c-ip"), None);
        assert_eq!(schema.fields()[1].identifier, "c-ip");
        assert_eq!(schema.fields()[1].kind, LiteralKind::Address);
    }

    #[test]
    fn test_duplicate_names() {
        let err = Schema::from_identifiers(&["date", "c-ip", "c-ip"], Some(4)).unwrap_err();
        assert!(matches!(err, W3CError::Fields { line: Some(4), .. }));
        // Distinct identifiers that sanitize alike collide too.
        let err = Schema::from_identifiers(&["c-ip", "c_ip"], None).unwrap_err();
        assert!(matches!(err, W3CError::Fields { line: None, .. }));
    }
}
