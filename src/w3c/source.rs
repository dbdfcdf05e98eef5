//! The W3C source state machine.
//!
//! `ReadingHeader` → `ReadingRows` → `Closed`. The header is resolved eagerly
//! on the first row request (or an explicit [`W3CSource::read_header`]);
//! rows are decoded lazily, one line at a time, and never replayed.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use log::debug;

use crate::error_handling::{LogWarnings, W3CError, WarningSink};

use super::directives::{parse_directive, Directive};
use super::row::Row;
use super::schema::Schema;

/// Header metadata, immutable once resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub version: String,
    /// Last `#Software` value
    pub software: Option<String>,
    /// `#Date`, or `#Start-Date` when `#Date` is absent
    pub date: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    /// Every `#Remark` value, in order
    pub remarks: Vec<String>,
    /// Raw `#Fields` identifiers
    pub fields: Vec<String>,
}

#[derive(Default)]
struct HeaderBuilder {
    version: Option<String>,
    software: Option<String>,
    date: Option<NaiveDateTime>,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
    remarks: Vec<String>,
    fields: Option<(Vec<String>, Schema)>,
}

impl HeaderBuilder {
    fn apply(&mut self, directive: Directive, line: usize) -> Result<(), W3CError> {
        match directive {
            Directive::Version(version) => {
                if self.version.is_some() {
                    return Err(W3CError::version("Duplicate #Version directive", Some(line)));
                }
                self.version = Some(version);
            }
            Directive::Fields(identifiers) => {
                if self.fields.is_some() {
                    return Err(W3CError::fields("Duplicate #Fields directive", Some(line)));
                }
                let schema = Schema::from_identifiers(&identifiers, Some(line))?;
                self.fields = Some((identifiers, schema));
            }
            Directive::Software(software) => self.software = Some(software),
            Directive::Remark(remark) => self.remarks.push(remark),
            Directive::Date(ts) => self.date = Some(ts),
            Directive::StartDate(ts) => self.start_date = Some(ts),
            Directive::EndDate(ts) => self.end_date = Some(ts),
        }
        Ok(())
    }

    fn finish(self, line: Option<usize>) -> Result<(Header, Schema), W3CError> {
        let version = self
            .version
            .ok_or_else(|| W3CError::version("Missing #Version directive", line))?;
        let (fields, schema) = self
            .fields
            .ok_or_else(|| W3CError::fields("Missing #Fields directive", line))?;
        let header = Header {
            version,
            software: self.software,
            date: self.date.or(self.start_date),
            start_date: self.start_date,
            end_date: self.end_date,
            remarks: self.remarks,
            fields,
        };
        Ok((header, schema))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingHeader,
    ReadingRows,
    Closed,
}

/// Adapts in-memory lines to the fallible line input of [`W3CSource`].
#[derive(Debug, Clone)]
pub struct InMemoryLines<I>(I);

impl<I> Iterator for InMemoryLines<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|line| Ok(line.into()))
    }
}

/// Line input over a byte reader.
///
/// Bytes that are not UTF-8 (logs written in a Windows code page) are
/// replaced with U+FFFD instead of failing the line; only read failures are
/// errors.
#[derive(Debug)]
pub struct ReaderLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for ReaderLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                if matches!(line, Cow::Owned(_)) {
                    debug!("Replaced invalid UTF-8 in log line: {line:?}");
                }
                Some(Ok(line.into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// A forward-only sequence of rows over W3C log lines.
///
/// Yields `Err` once for a fatal header or input error, then nothing. Data
/// warnings never appear in the sequence; they go to the installed
/// [`WarningSink`] (by default, the log). The line input is released when
/// the source closes: on exhaustion, on a fatal error, on [`close`] or on drop.
///
/// [`close`]: W3CSource::close
pub struct W3CSource<I> {
    lines: Option<I>,
    state: State,
    line_no: usize,
    pending: Option<(usize, String)>,
    header: Option<Header>,
    schema: Option<Arc<Schema>>,
    warnings: Box<dyn WarningSink>,
}

impl W3CSource<ReaderLines<BufReader<File>>> {
    /// Opens a log file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> W3CSource<ReaderLines<BufReader<R>>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderLines::new(BufReader::new(reader)))
    }
}

impl<L> W3CSource<InMemoryLines<L>>
where
    L: Iterator,
    L::Item: Into<String>,
{
    /// Reads from lines already in memory; trailing line terminators are allowed.
    pub fn from_lines<T>(lines: T) -> Self
    where
        T: IntoIterator<IntoIter = L>,
    {
        Self::new(InMemoryLines(lines.into_iter()))
    }
}

impl<I> W3CSource<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines: Some(lines),
            state: State::ReadingHeader,
            line_no: 0,
            pending: None,
            header: None,
            schema: None,
            warnings: Box::new(LogWarnings),
        }
    }

    /// Sends data warnings to `sink` instead of the log.
    pub fn with_warnings(mut self, sink: impl WarningSink + 'static) -> Self {
        self.warnings = Box::new(sink);
        self
    }

    /// Resolves the header if that has not happened yet.
    ///
    /// # Errors
    ///
    /// The fatal header error, after which the source is closed. A source
    /// that closed without a header answers [`W3CError::Closed`].
    pub fn read_header(&mut self) -> Result<&Header, W3CError> {
        if self.state == State::ReadingHeader {
            self.resolve_header()?;
        }
        self.header.as_ref().ok_or(W3CError::Closed)
    }

    /// Header metadata, once resolved.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn version(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.version.as_str())
    }

    pub fn software(&self) -> Option<&str> {
        self.header.as_ref().and_then(|h| h.software.as_deref())
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.header.as_ref().and_then(|h| h.date)
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.header.as_ref().map(|h| h.fields.as_slice())
    }

    /// The field table rows are decoded against, once resolved.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Releases the line input; the source yields nothing afterwards.
    pub fn close(&mut self) {
        self.lines = None;
        self.pending = None;
        self.state = State::Closed;
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, W3CError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        match lines.next() {
            Some(line) => {
                let mut line = line?;
                let kept = line.trim_end_matches(['\r', '\n']).len();
                line.truncate(kept);
                self.line_no += 1;
                Ok(Some((self.line_no, line)))
            }
            None => Ok(None),
        }
    }

    fn scan_header(&mut self) -> Result<(Header, Schema), W3CError> {
        let mut builder = HeaderBuilder::default();
        while let Some((line_no, line)) = self.next_line()? {
            if line.trim().is_empty() {
                continue;
            }
            if !line.starts_with('#') {
                self.pending = Some((line_no, line));
                break;
            }
            match parse_directive(&line, line_no) {
                Some(directive) => builder.apply(directive?, line_no)?,
                None => {
                    return Err(W3CError::directive(
                        format!("Malformed directive {line:?}"),
                        Some(line_no),
                    ))
                }
            }
        }
        builder.finish(self.pending.as_ref().map(|(line_no, _)| *line_no))
    }

    fn resolve_header(&mut self) -> Result<(), W3CError> {
        match self.scan_header() {
            Ok((header, schema)) => {
                debug!(
                    "W3C header resolved: version {}, software {:?}, {} fields",
                    header.version,
                    header.software,
                    header.fields.len()
                );
                self.header = Some(header);
                self.schema = Some(Arc::new(schema));
                self.state = State::ReadingRows;
                Ok(())
            }
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }

    /// Handles a `#` line met after the header (a restarted server appends a
    /// fresh header block).
    fn data_directive(&self, line_no: usize, line: &str) -> Result<(), W3CError> {
        match parse_directive(line, line_no) {
            None => Err(W3CError::directive(
                format!("Malformed directive {line:?}"),
                Some(line_no),
            )),
            Some(Err(e)) => Err(e),
            Some(Ok(Directive::Fields(identifiers))) => {
                if self.fields() == Some(identifiers.as_slice()) {
                    Ok(())
                } else {
                    Err(W3CError::fields(
                        "#Fields directive changes the field list",
                        Some(line_no),
                    ))
                }
            }
            Some(Ok(directive)) => {
                debug!("Ignoring directive in data region at line {line_no}: {directive:?}");
                Ok(())
            }
        }
    }
}

impl<I> Iterator for W3CSource<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Row, W3CError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::ReadingHeader {
            if let Err(e) = self.resolve_header() {
                return Some(Err(e));
            }
        }

        loop {
            if self.state == State::Closed {
                return None;
            }
            let next = match self.pending.take() {
                Some(pending) => Ok(Some(pending)),
                None => self.next_line(),
            };
            let (line_no, line) = match next {
                Ok(Some(next)) => next,
                Ok(None) => {
                    self.close();
                    return None;
                }
                Err(e) => {
                    self.close();
                    return Some(Err(e));
                }
            };

            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                if let Err(e) = self.data_directive(line_no, &line) {
                    self.close();
                    return Some(Err(e));
                }
                continue;
            }

            let Some(schema) = self.schema.as_ref() else {
                self.close();
                return None;
            };
            match Row::decode(schema, &line, line_no) {
                Ok(row) => return Some(Ok(row)),
                Err(warning) => self.warnings.warn(&warning),
            }
        }
    }
}

impl<I> FusedIterator for W3CSource<I> where I: Iterator<Item = io::Result<String>> {}
