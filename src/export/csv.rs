//! CSV export functionality.
//!
//! One record per data line, with a header record of attribute names.
//! Null values are written as empty cells.

use anyhow::{Context, Result};
use csv::Writer;
use log::debug;
use std::io::{self, Write};
use std::sync::Arc;

use crate::w3c::W3CSource;

use super::output::open_output;
use super::row::build_columns;
use super::types::ExportOptions;

/// Exports every row of `source` to `writer` as CSV.
///
/// # Returns
///
/// Returns the number of records exported, or an error if the source hits a
/// fatal header/input error or the writer fails.
pub fn write_csv_to<W, I>(
    source: &mut W3CSource<I>,
    writer: W,
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

    let mut writer = Writer::from_writer(writer);
    writer
        .write_record(columns.iter().map(|c| c.name.as_str()))
        .context("Failed to write CSV header")?;

    let mut record_count = 0;
    for row in source.by_ref() {
        let row = row?;
        writer
            .write_record(columns.iter().map(|c| c.column.csv_cell(&row)))
            .with_context(|| format!("Failed to write CSV record {}", record_count + 1))?;
        record_count += 1;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    debug!("Wrote {record_count} CSV records ({} columns)", columns.len());
    Ok(record_count)
}

/// Exports every row of `source` as CSV to `opts.output` (or stdout).
pub fn write_csv<I>(source: &mut W3CSource<I>, opts: &ExportOptions) -> Result<usize>
where
    I: Iterator<Item = io::Result<String>>,
{
    let writer = open_output(opts.output.as_deref())?;
    write_csv_to(source, writer, opts)
}
