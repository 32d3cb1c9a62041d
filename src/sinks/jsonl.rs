use std::borrow::Cow;
use std::io::{BufWriter, Write};

use crate::error::{Error, Result};
use crate::record::NormalizedRecord;
use crate::sinks::{RecordSink, SinkContext};

/// Writes one JSON object per record, the payload uploaded to the record
/// store. Numbers stay numbers; omitted fields are absent from the object.
pub struct JsonLinesSink<W: Write> {
    output: Option<W>,
    writer: Option<BufWriter<W>>,
}

impl<W: Write> JsonLinesSink<W> {
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            output: Some(writer),
            writer: None,
        }
    }

    /// Returns the underlying writer once the sink has been finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink is still open.
    pub fn into_inner(mut self) -> Result<W> {
        self.output.take().ok_or_else(|| Error::Json {
            details: Cow::from("JSON lines sink must be finished before taking its output"),
        })
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn begin(&mut self, _context: SinkContext<'_>) -> Result<()> {
        let output = self.output.take().ok_or_else(|| Error::Json {
            details: Cow::from("JSON lines sink cannot be reused without finishing"),
        })?;
        self.writer = Some(BufWriter::new(output));
        Ok(())
    }

    fn write_record(&mut self, record: &NormalizedRecord) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| Error::Json {
            details: Cow::from("JSON lines sink used before begin"),
        })?;
        serde_json::to_writer(&mut *writer, &record.to_fields())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            let out = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
            self.output = Some(out);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use crate::record::Row;

    #[test]
    fn writes_one_object_per_line() {
        let rows: Vec<Row> = [("4 ft", "1"), ("2 - 3 ft", "2")]
            .into_iter()
            .map(|(width, rank)| {
                [("Width", width.to_owned()), ("Popularity Ranking", rank.to_owned())]
                    .into_iter()
                    .collect()
            })
            .collect();
        let normalizer = Normalizer::default();

        let mut sink = JsonLinesSink::new(Vec::new());
        sink.begin(SinkContext::new(&[])).unwrap();
        for row in &rows {
            sink.write_record(&normalizer.normalize(row).unwrap()).unwrap();
        }
        sink.finish().unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "{\"Width\":\"4 ft\",\"Popularity Ranking\":1,\"Mature Width - max (ft)\":4.0}\n\
             {\"Width\":\"2 - 3 ft\",\"Popularity Ranking\":2,\"Mature Width - min (ft)\":2.0,\"Mature Width - max (ft)\":3.0}\n"
        );
    }
}
