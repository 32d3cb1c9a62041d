pub mod batch;
pub mod dimension;
pub mod error;
pub mod logger;
pub mod normalize;
pub mod options;
pub mod record;
pub mod sinks;
pub mod soil;
pub mod source;
pub mod units;
pub mod value;
pub use crate::error::{Error, Field, Result};
pub use batch::{BatchSummary, normalize_rows};
pub use dimension::{ParsedDimension, parse_dimension};
pub use normalize::Normalizer;
pub use options::{NormalizeOptions, SourceOptions};
pub use record::{FieldMap, NormalizedRecord, Row};
pub use sinks::{CollectSink, CsvSink, JsonLinesSink, RecordSink, SinkContext};
pub use soil::{SoilSplit, split_soil};
pub use value::FieldValue;

/// Normalizes one row with default options and returns the output mapping.
///
/// Convenience wrapper over [`Normalizer::normalize`] and
/// [`NormalizedRecord::into_fields`].
///
/// # Errors
///
/// Returns an error if the row's popularity ranking is not an integer.
pub fn normalize(row: &Row) -> Result<FieldMap> {
    Normalizer::default()
        .normalize(row)
        .map(NormalizedRecord::into_fields)
}
