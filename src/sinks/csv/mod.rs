mod encode;
mod sink;

pub use sink::CsvSink;

pub(crate) const DEFAULT_DELIMITER: u8 = b',';
pub(crate) const DEFAULT_WRITE_HEADERS: bool = true;
pub(crate) const DEFAULT_SCRATCH_CAPACITY: usize = 64;
