mod csv;
mod jsonl;

use crate::error::Result;
use crate::record::{FieldMap, NormalizedRecord};

pub use self::csv::CsvSink;
pub use self::jsonl::JsonLinesSink;

/// Provides export-level information to sinks during initialisation.
#[derive(Debug, Clone, Copy)]
pub struct SinkContext<'a> {
    /// Column names of the export, in file order.
    pub headers: &'a [String],
}

impl<'a> SinkContext<'a> {
    #[must_use]
    pub const fn new(headers: &'a [String]) -> Self {
        Self { headers }
    }
}

/// Trait implemented by consumers of normalized records, such as the
/// record-store uploader.
pub trait RecordSink {
    /// Called before any records are written to allow the sink to initialise internal state.
    fn begin(&mut self, context: SinkContext<'_>) -> Result<()>;

    /// Invoked for every successfully normalized record.
    fn write_record(&mut self, record: &NormalizedRecord) -> Result<()>;

    /// Called once all records have been forwarded to the sink.
    fn finish(&mut self) -> Result<()>;
}

/// Keeps output mappings in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    records: Vec<FieldMap>,
}

impl CollectSink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[FieldMap] {
        &self.records
    }
}

impl RecordSink for CollectSink {
    fn begin(&mut self, _context: SinkContext<'_>) -> Result<()> {
        self.records.clear();
        Ok(())
    }

    fn write_record(&mut self, record: &NormalizedRecord) -> Result<()> {
        self.records.push(record.to_fields());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
