use std::borrow::Cow;

use csv::ByteRecord;
use itoa::Buffer as ItoaBuffer;
use ryu::Buffer as RyuBuffer;

use crate::error::{Error, Result};
use crate::value::FieldValue;

/// Writes `value` into `out`; a missing value leaves `out` empty.
pub fn encode_value(
    value: Option<&FieldValue>,
    out: &mut Vec<u8>,
    ryu: &mut RyuBuffer,
    itoa: &mut ItoaBuffer,
) {
    out.clear();
    match value {
        None => {}
        Some(FieldValue::Float(v)) => {
            let s = ryu.format(*v);
            out.extend_from_slice(s.as_bytes());
        }
        Some(FieldValue::Int(v)) => {
            let s = itoa.format(*v);
            out.extend_from_slice(s.as_bytes());
        }
        Some(FieldValue::Text(s)) => out.extend_from_slice(s.as_bytes()),
    }
}

pub fn flush_record<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    record: &ByteRecord,
) -> Result<()> {
    writer
        .write_byte_record(record)
        .map_err(|e| Error::Csv {
            details: Cow::Owned(format!("csv write failed: {e}")),
        })
}
