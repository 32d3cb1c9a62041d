use serde::Serialize;

use crate::error::Result;
use crate::logger::{log_error, set_log_prefix};
use crate::normalize::Normalizer;
use crate::record::UNNAMED_RECORD;
use crate::sinks::{RecordSink, SinkContext};
use crate::source::RowSet;

/// Per-row outcome counts for one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub rows: usize,
    /// Rows where every field normalized.
    pub normalized: usize,
    /// Rows written with at least one field omitted.
    pub partial: usize,
    /// Rows that could not be normalized and were not written.
    pub rejected: usize,
}

impl BatchSummary {
    #[must_use]
    pub const fn written(&self) -> usize {
        self.normalized + self.partial
    }
}

/// Normalizes every row of `rows` into `sink`, in order.
///
/// A rejected row is logged under its record name and skipped, unless
/// `fail_fast` is set, in which case its error is returned and the sink is left
/// unfinished.
///
/// # Errors
///
/// Returns sink errors, and the first rejection when `fail_fast` is set.
pub fn normalize_rows<S: RecordSink>(
    rows: &RowSet,
    normalizer: &Normalizer,
    sink: &mut S,
    fail_fast: bool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    sink.begin(SinkContext::new(rows.headers()))?;

    for (index, row) in rows.rows().iter().enumerate() {
        summary.rows += 1;
        match normalizer.normalize(row) {
            Ok(record) => {
                if record.is_partial() {
                    summary.partial += 1;
                } else {
                    summary.normalized += 1;
                }
                sink.write_record(&record)?;
            }
            Err(err) => {
                let name = row
                    .get(normalizer.options().name_column())
                    .filter(|name| !normalizer.options().is_missing(name))
                    .map_or(UNNAMED_RECORD, String::as_str);
                let _prefix = set_log_prefix(name);
                log_error(&format!("row {}: {err}; record skipped", index + 1));
                if fail_fast {
                    return Err(err);
                }
                summary.rejected += 1;
            }
        }
    }

    sink.finish()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::options::SourceOptions;
    use crate::sinks::CollectSink;
    use crate::source::read_rows;

    const EXPORT: &str = "Current Botanical Name,Height,Width,Popularity Ranking\n\
                          Salvia apiana,3 - 5 ft(0.9 - 1.5 m),5 ft(,1\n\
                          Ceanothus,6 ft,8 ft,often\n\
                          Eriogonum,1 - 3 ft(0.3 - 0.9 m),2 ft,3\n";

    #[test]
    fn counts_outcomes_and_skips_rejected_rows() {
        let rows = read_rows(EXPORT.as_bytes(), &SourceOptions::new()).unwrap();
        let mut sink = CollectSink::new();
        let summary = normalize_rows(&rows, &Normalizer::default(), &mut sink, false).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                rows: 3,
                normalized: 1,
                partial: 1,
                rejected: 1,
            }
        );
        assert_eq!(summary.written(), 2);
        let names: Vec<_> = sink
            .records()
            .iter()
            .filter_map(|fields| fields.get("Current Botanical Name"))
            .filter_map(|value| value.as_text())
            .collect();
        assert_eq!(names, ["Salvia apiana", "Eriogonum"]);
    }

    #[test]
    fn fail_fast_returns_first_rejection() {
        let rows = read_rows(EXPORT.as_bytes(), &SourceOptions::new()).unwrap();
        let mut sink = CollectSink::new();
        let err = normalize_rows(&rows, &Normalizer::default(), &mut sink, true).unwrap_err();
        assert!(matches!(err, Error::TypeCoercion { ref value, .. } if value == "often"));
        assert_eq!(sink.records().len(), 1);
    }
}
