//! JSONL (JSON Lines) export functionality.
//!
//! Exports one JSON object per data line. Keys are attribute names in column
//! order; nulls are JSON `null`, integers and fixed-point values stay numeric.

use anyhow::{Context, Result};
use log::debug;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::sync::Arc;

use crate::w3c::W3CSource;

use super::output::open_output;
use super::row::build_columns;
use super::types::ExportOptions;

/// Exports every row of `source` to `writer` as JSON Lines.
///
/// # Returns
///
/// Returns the number of records exported.
pub fn write_jsonl_to<W, I>(
    source: &mut W3CSource<I>,
    mut writer: W,
    opts: &ExportOptions,
) -> Result<usize>
where
    W: Write,
    I: Iterator<Item = io::Result<String>>,
{
    source.read_header()?;
    let schema = Arc::clone(
        source
            .schema()
            .context("Source has a header but no field table")?,
    );
    let columns = build_columns(&schema, opts);

    let mut record_count = 0;
    for row in source.by_ref() {
        let row = row?;
        let mut object = Map::with_capacity(columns.len());
        for named in &columns {
            object.insert(named.name.clone(), named.column.json_value(&row)?);
        }
        serde_json::to_writer(&mut writer, &Value::Object(object))
            .context("Failed to serialize JSON record")?;
        writeln!(writer).context("Failed to write newline")?;
        record_count += 1;
    }

    writer.flush().context("Failed to flush output")?;
    debug!("Wrote {record_count} JSONL records");
    Ok(record_count)
}

/// Exports every row of `source` as JSON Lines to `opts.output` (or stdout).
pub fn write_jsonl<I>(source: &mut W3CSource<I>, opts: &ExportOptions) -> Result<usize>
where
    I: Iterator<Item = io::Result<String>>,
{
    let writer = open_output(opts.output.as_deref())?;
    write_jsonl_to(source, writer, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_jsonl_to_buffer() {
        let log = "#Version: 1.0\n#Fields: date c-ip sc-status time-taken cs-uri-stem\n\
2002-05-24 10.0.0.1 200 15 /Default.htm\n\
2002-05-24 - 404 - -\n";
        let mut source = W3CSource::from_lines(log.lines());
        let mut out = Vec::new();
        let count = write_jsonl_to(&mut source, &mut out, &ExportOptions::default()).unwrap();
        assert_eq!(count, 2);

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(
            lines[0],
            serde_json::json!({
                "date": "2002-05-24",
                "c_ip": "10.0.0.1",
                "sc_status": 200,
                "time_taken": 15.0,
                "cs_uri_stem": "/Default.htm",
            })
        );
        assert_eq!(lines[1]["c_ip"], Value::Null);
        assert_eq!(lines[1]["sc_status"], serde_json::json!(404));
    }

    #[test]
    fn test_key_order_follows_fields() {
        let log = "#Version: 1.0\n#Fields: time date\n20:18:01 2002-05-24\n";
        let mut source = W3CSource::from_lines(log.lines());
        let mut out = Vec::new();
        write_jsonl_to(&mut source, &mut out, &ExportOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.find("\"time\"").unwrap() < text.find("\"date\"").unwrap());
    }
}
