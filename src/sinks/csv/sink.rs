use std::borrow::Cow;
use std::io::Write;

use csv::{ByteRecord, Writer, WriterBuilder};
use itoa::Buffer as ItoaBuffer;
use ryu::Buffer as RyuBuffer;

use crate::error::{Error, Result};
use crate::record::{NormalizedRecord, derived_keys};
use crate::sinks::{RecordSink, SinkContext};

use super::encode::{encode_value, flush_record};
use super::{DEFAULT_DELIMITER, DEFAULT_SCRATCH_CAPACITY, DEFAULT_WRITE_HEADERS};

/// Writes normalized records into a delimited text file (CSV/TSV).
///
/// Columns are the export's own columns followed by any derived column the
/// export did not already carry. Omitted values are written as empty cells.
pub struct CsvSink<W: Write> {
    output: Option<W>,
    writer: Option<Writer<W>>,
    delimiter: u8,
    write_headers: bool,
    columns: Vec<String>,
    record: ByteRecord,
    scratch: Vec<u8>,
}

impl<W: Write> CsvSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            output: Some(writer),
            writer: None,
            delimiter: DEFAULT_DELIMITER,
            write_headers: DEFAULT_WRITE_HEADERS,
            columns: Vec::new(),
            record: ByteRecord::new(),
            scratch: Vec::with_capacity(DEFAULT_SCRATCH_CAPACITY),
        }
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn with_headers(mut self, headers: bool) -> Self {
        self.write_headers = headers;
        self
    }

    /// Output columns resolved by the last call to `begin`.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the underlying writer once the sink has been finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink is still open.
    pub fn into_inner(mut self) -> Result<W> {
        self.output.take().ok_or_else(|| Error::Csv {
            details: Cow::from("CSV sink must be finished before taking its output"),
        })
    }

    fn build_writer(&mut self) -> Result<()> {
        let output = self.output.take().ok_or_else(|| Error::Csv {
            details: Cow::from("CSV sink output already taken"),
        })?;
        let mut builder = WriterBuilder::new();
        builder.delimiter(self.delimiter);
        self.writer = Some(builder.from_writer(output));
        Ok(())
    }

    fn writer_mut(&mut self) -> Result<&mut Writer<W>> {
        self.writer.as_mut().ok_or_else(|| Error::Csv {
            details: Cow::from("CSV sink used before begin"),
        })
    }

    fn write_headers(&mut self) -> Result<()> {
        if !self.write_headers {
            return Ok(());
        }
        let mut header = ByteRecord::with_capacity(0, self.columns.len());
        for column in &self.columns {
            header.push_field(column.as_bytes());
        }
        let writer = self.writer_mut()?;
        writer.write_byte_record(&header).map_err(|e| Error::Csv {
            details: Cow::Owned(format!("csv header write failed: {e}")),
        })
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn begin(&mut self, context: SinkContext<'_>) -> Result<()> {
        if self.writer.is_some() {
            return Err(Error::Csv {
                details: Cow::from("CSV sink cannot be reused without finishing"),
            });
        }

        self.build_writer()?;
        self.columns = context.headers.to_vec();
        for key in derived_keys() {
            if !self.columns.iter().any(|column| column == key) {
                self.columns.push(key.to_owned());
            }
        }
        self.record = ByteRecord::with_capacity(0, self.columns.len());

        self.write_headers()
    }

    fn write_record(&mut self, record: &NormalizedRecord) -> Result<()> {
        let fields = record.to_fields();
        let mut ryu = RyuBuffer::new();
        let mut itoa = ItoaBuffer::new();

        self.record.clear();
        for column in &self.columns {
            encode_value(fields.get(column), &mut self.scratch, &mut ryu, &mut itoa);
            self.record.push_field(&self.scratch);
        }
        let writer = self.writer.as_mut().ok_or_else(|| Error::Csv {
            details: Cow::from("CSV sink used before begin"),
        })?;
        flush_record(writer, &self.record)
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            let out = writer.into_inner().map_err(|e| Error::Csv {
                details: Cow::Owned(format!("csv into_inner failed: {e}")),
            })?;
            self.output = Some(out);
        }
        self.record.clear();
        Ok(())
    }
}
