//! Decoded data lines.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::datatypes::Value;
use crate::error_handling::{DataWarning, WarningKind};

use super::schema::Schema;

/// One decoded data line: a value (or null) per schema field, in schema order.
#[derive(Debug, Clone)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<Option<Value>>,
}

impl Row {
    /// Tokenizes `line` on whitespace and converts each token.
    ///
    /// A token count mismatch or a failed conversion gives the warning that
    /// drops this line instead of a row.
    pub(crate) fn decode(
        schema: &Arc<Schema>,
        line: &str,
        line_no: usize,
    ) -> Result<Self, DataWarning> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != schema.len() {
            return Err(DataWarning::new(
                line_no,
                WarningKind::FieldCount,
                format!(
                    "Expected {} fields but found {}",
                    schema.len(),
                    tokens.len()
                ),
            ));
        }

        let values = schema
            .fields()
            .iter()
            .zip(tokens)
            .map(|(field, token)| {
                field.kind.convert(token).map_err(|e| {
                    DataWarning::new(
                        line_no,
                        WarningKind::Conversion,
                        format!("Field {}: {e}", field.identifier),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of attribute `name`; `None` for a null field or an unknown name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).flatten()
    }

    /// `None` for an unknown name, `Some(None)` for a null field.
    pub fn field(&self, name: &str) -> Option<Option<&Value>> {
        let position = self.schema.position(name)?;
        self.values.get(position).map(Option::as_ref)
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// `(attribute name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.schema
            .names()
            .zip(self.values.iter().map(Option::as_ref))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schema(identifiers: &[&str]) -> Arc<Schema> {
        Arc::new(Schema::from_identifiers(identifiers, None).unwrap())
    }

    #[test]
    fn test_decode_typed_values() {
        let schema = schema(&["date", "c-ip", "cs-username", "sc-status", "cs(User-Agent)"]);
        let row = Row::decode(
            &schema,
            "2002-05-24 172.224.24.114 - 200 Mozilla/4.0+(compatible)",
            7,
        )
        .unwrap();

        assert_eq!(row.len(), 5);
        assert_eq!(
            row.get("date"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2002, 5, 24).unwrap()))
        );
        assert_eq!(row.get("c_ip").unwrap().to_string(), "172.224.24.114");
        assert_eq!(row.field("cs_username"), Some(None));
        assert_eq!(row.field("nope"), None);
        assert_eq!(row.get("sc_status"), Some(&Value::Integer(200)));
        assert_eq!(
            row.get("cs_User_Agent"),
            Some(&Value::String("Mozilla/4.0 (compatible)".into()))
        );
        assert_eq!(
            row.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["date", "c_ip", "cs_username", "sc_status", "cs_User_Agent"]
        );
    }

    #[test]
    fn test_field_count_mismatch() {
        let schema = schema(&["date", "time", "c-ip"]);
        let warning = Row::decode(&schema, "2002-05-30 20:18:01", 4).unwrap_err();
        assert_eq!(warning.line, 4);
        assert_eq!(warning.kind, WarningKind::FieldCount);
        assert_eq!(warning.to_string(), "Line 4: Expected 3 fields but found 2");
    }

    #[test]
    fn test_conversion_failure() {
        let schema = schema(&["date", "time", "c-ip"]);
        let warning = Row::decode(&schema, "2002-05-30 20:18:01 172.224.24.300", 4).unwrap_err();
        assert_eq!(warning.kind, WarningKind::Conversion);
        assert!(warning.message.starts_with("Field c-ip: invalid address"));
    }

    #[test]
    fn test_serialize_as_map() {
        let schema = schema(&["sc-status", "cs-username", "time-taken"]);
        let row = Row::decode(&schema, "404 - 15", 1).unwrap();
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"sc_status":404,"cs_username":null,"time_taken":15.0}"#
        );
    }
}
