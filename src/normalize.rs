use crate::dimension::{ParsedDimension, parse_dimension_field};
use crate::error::{Error, Field, Result};
use crate::logger::{log_warn, set_log_prefix};
use crate::options::NormalizeOptions;
use crate::record::{FieldIssue, NormalizedRecord, Row, UNNAMED_RECORD};
use crate::soil::{SoilSplit, split_soil};

/// Turns export rows into [`NormalizedRecord`]s.
///
/// Stateless apart from its options, so one instance can be shared across
/// threads and rows can be normalized in any order.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    #[must_use]
    pub const fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalizes a single row.
    ///
    /// Height, width and soil failures are recorded on the returned record
    /// (and logged under the record's name) without aborting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeCoercion`] when the popularity ranking is present
    /// but not an integer.
    pub fn normalize(&self, row: &Row) -> Result<NormalizedRecord> {
        let options = &self.options;
        let passthrough: Row = row
            .iter()
            .filter(|(_, value)| !options.is_missing(value))
            .map(|(key, value)| (key, value.clone()))
            .collect();

        let name = passthrough.get(options.name_column()).cloned();
        let _prefix = set_log_prefix(name.as_deref().unwrap_or(UNNAMED_RECORD));

        let mut issues = Vec::new();
        let height = dimension(&passthrough, options.height_column(), Field::Height, &mut issues);
        let width = dimension(&passthrough, options.width_column(), Field::Width, &mut issues);
        let soil = passthrough
            .get(options.soil_column())
            .map_or_else(SoilSplit::default, |raw| split_soil(raw));

        let popularity_ranking = passthrough
            .get(options.popularity_column())
            .map(|raw| coerce_integer(raw, Field::PopularityRanking))
            .transpose()?;

        Ok(NormalizedRecord {
            name,
            height,
            width,
            soil,
            popularity_column: options.popularity_column().to_owned(),
            popularity_ranking,
            passthrough,
            issues,
        })
    }
}

fn dimension(row: &Row, column: &str, field: Field, issues: &mut Vec<FieldIssue>) -> ParsedDimension {
    let Some(raw) = row.get(column) else {
        return ParsedDimension::EMPTY;
    };
    match parse_dimension_field(raw, field) {
        Ok(parsed) => parsed,
        Err(err) => {
            log_warn(&err.to_string());
            issues.push(FieldIssue {
                field,
                raw: raw.clone(),
                reason: issue_reason(err),
            });
            ParsedDimension::EMPTY
        }
    }
}

fn issue_reason(err: Error) -> String {
    match err {
        Error::FieldParse { details, .. } => details.into_owned(),
        other => other.to_string(),
    }
}

/// Parses an integer cell. Decimal text with an all-zero fraction (`"12.0"`)
/// is accepted because numeric spreadsheet columns with gaps are exported as
/// floats; exponents and fractional values are not.
fn coerce_integer(raw: &str, field: Field) -> Result<i64> {
    let text = raw.trim();
    let whole = match text.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => Some(whole),
        Some(_) => None,
        None => Some(text),
    };
    whole
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| Error::TypeCoercion {
            field,
            value: raw.to_owned(),
        })
}
