//! Reading delimited spreadsheet exports into [`Row`]s.
//!
//! Exports saved from legacy spreadsheet tools are frequently Windows-1252
//! rather than UTF-8; bytes that fail UTF-8 validation are decoded as such.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use simdutf8::basic;

use crate::error::{Error, Result};
use crate::options::SourceOptions;
use crate::record::Row;

/// Rows of one export together with its header order.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl RowSet {
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Opens `path` and reads it with [`read_rows`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_rows_from_path(path: &Path, options: &SourceOptions) -> Result<RowSet> {
    read_rows(File::open(path)?, options)
}

/// Reads a delimited export: skips `options.skip_rows()` preamble records
/// (completely empty lines do not count), takes the next record as the header
/// and every later record as a row.
/// Columns with a blank header and rows with no non-blank cell are dropped.
///
/// # Errors
///
/// Returns an error on I/O failure, malformed CSV, a missing header row, or
/// duplicated header names.
pub fn read_rows<R: Read>(mut reader: R, options: &SourceOptions) -> Result<RowSet> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = decode_text(&bytes);

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter())
        .from_reader(text.as_bytes());
    let mut records = csv_reader.records().skip(options.skip_rows());

    let Some(header_record) = records.next().transpose()? else {
        return Err(Error::Config {
            details: Cow::Owned(format!(
                "export has no header row after skipping {} rows",
                options.skip_rows()
            )),
        });
    };
    let headers: Vec<String> = header_record
        .iter()
        .map(|name| name.trim().to_owned())
        .collect();
    ensure_unique_headers(&headers)?;

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.as_str(), cell.to_owned()))
            .collect();
        rows.push(row);
    }

    let headers = headers.into_iter().filter(|name| !name.is_empty()).collect();
    Ok(RowSet { headers, rows })
}

fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match basic::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

fn ensure_unique_headers(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(headers.len());
    for name in headers.iter().filter(|name| !name.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(Error::Config {
                details: Cow::Owned(format!("duplicate column '{name}' in export header")),
            });
        }
    }
    Ok(())
}
