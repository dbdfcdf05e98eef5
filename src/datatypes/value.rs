//! Typed field values held by a row.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

use super::{Address, Hostname, Url};

/// One converted field. Null fields are `None` in the row, never a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Fixed(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    String(String),
    Url(Url),
    Name(Hostname),
    Address(Address),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Fixed(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Value::Address(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Fixed(x) => write!(f, "{x}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::String(s) => f.write_str(s),
            Value::Url(u) => write!(f, "{u}"),
            Value::Name(h) => write!(f, "{h}"),
            Value::Address(a) => write!(f, "{a}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Fixed(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            other => serializer.collect_str(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Fixed(31.0).to_string(), "31");
        assert_eq!(Value::Fixed(-101.5).to_string(), "-101.5");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2002, 5, 24).unwrap()).to_string(),
            "2002-05-24"
        );
        assert_eq!(
            Value::Time(NaiveTime::from_hms_opt(20, 18, 1).unwrap()).to_string(),
            "20:18:01"
        );
        assert_eq!(
            Value::Address(Address::parse("[::1]:80").unwrap()).to_string(),
            "[::1]:80"
        );
    }

    #[test]
    fn test_serialize_json() {
        assert_eq!(serde_json::to_string(&Value::Integer(200)).unwrap(), "200");
        assert_eq!(serde_json::to_string(&Value::Fixed(0.5)).unwrap(), "0.5");
        assert_eq!(
            serde_json::to_string(&Value::String("a \"b\"".into())).unwrap(),
            r#""a \"b\"""#
        );
        assert_eq!(
            serde_json::to_string(&Value::Url(Url::parse("http://foo/").unwrap())).unwrap(),
            r#""http://foo/""#
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Integer(7).as_i64(), Some(7));
        assert_eq!(Value::Integer(7).as_f64(), Some(7.0));
        assert_eq!(Value::String("x".into()).as_str(), Some("x"));
        assert_eq!(Value::String("x".into()).as_i64(), None);
        assert!(Value::Address(Address::parse("10.0.0.1").unwrap())
            .as_address()
            .is_some());
    }
}
