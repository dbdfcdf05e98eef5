//! Shared export row building logic.
//!
//! Both exporters flatten a [`Row`] into the same column layout: the schema
//! fields in order, each address column optionally followed by its
//! enrichment columns (reverse DNS, then GeoIP).

use crate::config::{
    CITY_COLUMN_SUFFIX, COUNTRY_COLUMN_SUFFIX, CSV_NULL, HOSTNAME_COLUMN_SUFFIX,
    LATITUDE_COLUMN_SUFFIX, LONGITUDE_COLUMN_SUFFIX, REGION_COLUMN_SUFFIX,
};
use crate::datatypes::Address;
use crate::w3c::{LiteralKind, Row, Schema};

use super::types::ExportOptions;

/// One output column. The index is the schema position it reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportColumn {
    Field(usize),
    Hostname(usize),
    Country(usize),
    Region(usize),
    City(usize),
    Longitude(usize),
    Latitude(usize),
}

/// A column together with its header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NamedColumn {
    pub name: String,
    pub column: ExportColumn,
}

/// Lays out the output columns for `schema`.
pub(crate) fn build_columns(schema: &Schema, opts: &ExportOptions) -> Vec<NamedColumn> {
    let mut columns = Vec::with_capacity(schema.len());
    for (i, field) in schema.fields().iter().enumerate() {
        columns.push(NamedColumn {
            name: field.name.clone(),
            column: ExportColumn::Field(i),
        });
        if field.kind != LiteralKind::Address {
            continue;
        }
        let mut enrich = |suffix: &str, column: ExportColumn| {
            columns.push(NamedColumn {
                name: format!("{}{suffix}", field.name),
                column,
            })
        };
        if opts.resolve_hostnames {
            enrich(HOSTNAME_COLUMN_SUFFIX, ExportColumn::Hostname(i));
        }
        if opts.geoip {
            enrich(COUNTRY_COLUMN_SUFFIX, ExportColumn::Country(i));
            enrich(REGION_COLUMN_SUFFIX, ExportColumn::Region(i));
            enrich(CITY_COLUMN_SUFFIX, ExportColumn::City(i));
            enrich(LONGITUDE_COLUMN_SUFFIX, ExportColumn::Longitude(i));
            enrich(LATITUDE_COLUMN_SUFFIX, ExportColumn::Latitude(i));
        }
    }
    columns
}

fn address_at(row: &Row, i: usize) -> Option<&Address> {
    row.values().get(i)?.as_ref()?.as_address()
}

impl ExportColumn {
    /// Text of this column for `row`, `None` when null.
    pub(crate) fn text(self, row: &Row) -> Option<String> {
        match self {
            ExportColumn::Field(i) => row.values().get(i)?.as_ref().map(ToString::to_string),
            ExportColumn::Hostname(i) => {
                address_at(row, i)?.hostname().map(|h| h.as_str().to_string())
            }
            ExportColumn::Country(i) => address_at(row, i)?.country().map(str::to_string),
            ExportColumn::Region(i) => address_at(row, i)?.region().map(str::to_string),
            ExportColumn::City(i) => address_at(row, i)?.city().map(str::to_string),
            ExportColumn::Longitude(i) => {
                address_at(row, i)?.coords().map(|c| c.longitude.to_string())
            }
            ExportColumn::Latitude(i) => {
                address_at(row, i)?.coords().map(|c| c.latitude.to_string())
            }
        }
    }

    /// CSV cell for `row`; nulls become an empty cell.
    pub(crate) fn csv_cell(self, row: &Row) -> String {
        self.text(row).unwrap_or_else(|| CSV_NULL.to_string())
    }

    /// JSON value for `row`, keeping numbers numeric.
    pub(crate) fn json_value(self, row: &Row) -> serde_json::Result<serde_json::Value> {
        match self {
            ExportColumn::Field(i) => match row.values().get(i).and_then(Option::as_ref) {
                Some(value) => serde_json::to_value(value),
                None => Ok(serde_json::Value::Null),
            },
            ExportColumn::Longitude(i) | ExportColumn::Latitude(i) => {
                let coords = address_at(row, i).and_then(Address::coords);
                let degrees = coords.map(|c| match self {
                    ExportColumn::Longitude(_) => c.longitude,
                    _ => c.latitude,
                });
                Ok(degrees
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number))
            }
            _ => Ok(self
                .text(row)
                .map_or(serde_json::Value::Null, serde_json::Value::String)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::from_identifiers(&["date", "c-ip", "sc-status"], None).unwrap())
    }

    fn names(columns: &[NamedColumn]) -> Vec<&str> {
        columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_plain_columns() {
        let columns = build_columns(&schema(), &ExportOptions::default());
        assert_eq!(names(&columns), vec!["date", "c_ip", "sc_status"]);
    }

    #[test]
    fn test_enrichment_follows_address_column() {
        let opts = ExportOptions {
            resolve_hostnames: true,
            geoip: true,
            ..Default::default()
        };
        let columns = build_columns(&schema(), &opts);
        assert_eq!(
            names(&columns),
            vec![
                "date",
                "c_ip",
                "c_ip_hostname",
                "c_ip_country",
                "c_ip_region",
                "c_ip_city",
                "c_ip_longitude",
                "c_ip_latitude",
                "sc_status",
            ]
        );
        assert_eq!(columns[2].column, ExportColumn::Hostname(1));
        assert_eq!(columns[8].column, ExportColumn::Field(2));
    }

    #[test]
    fn test_cells() {
        let schema = schema();
        let row = Row::decode(&schema, "2002-05-24 - 200", 1).unwrap();
        assert_eq!(ExportColumn::Field(0).csv_cell(&row), "2002-05-24");
        assert_eq!(ExportColumn::Field(1).csv_cell(&row), "");
        assert_eq!(ExportColumn::Country(1).csv_cell(&row), "");
        assert_eq!(
            ExportColumn::Field(2).json_value(&row).unwrap(),
            serde_json::json!(200)
        );
        assert_eq!(
            ExportColumn::Field(1).json_value(&row).unwrap(),
            serde_json::Value::Null
        );
        assert_eq!(
            ExportColumn::Latitude(1).json_value(&row).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_geoip_columns_without_database_are_null() {
        crate::geoip::reset();
        let schema = schema();
        let row = Row::decode(&schema, "2002-05-24 8.8.8.8 200", 1).unwrap();
        assert_eq!(ExportColumn::Country(1).text(&row), None);
        assert_eq!(ExportColumn::Longitude(1).text(&row), None);
    }
}
