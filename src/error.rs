use std::borrow::Cow;
use std::fmt;
use std::io;

/// Result type used across the normalization engine.
pub type Result<T> = std::result::Result<T, Error>;

/// High-level error type surfaced by the normalizer and its I/O helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure while reading an export or writing output.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The delimited reader or writer rejected a record.
    #[error("csv error: {details}")]
    Csv { details: Cow<'static, str> },

    /// JSON serialization or config decoding failed.
    #[error("json error: {details}")]
    Json { details: Cow<'static, str> },

    /// A dimension or soil string did not match any recognised shape.
    ///
    /// Recovered locally: the derived fields for that one field are omitted.
    #[error("could not parse {field}: {details}")]
    FieldParse {
        field: Field,
        details: Cow<'static, str>,
    },

    /// A column that the export format guarantees to be typed was not.
    ///
    /// Fatal for the record being normalized.
    #[error("cannot coerce {field} value {value:?} to an integer")]
    TypeCoercion { field: Field, value: String },

    /// Options or input layout could not be interpreted.
    #[error("invalid configuration: {details}")]
    Config { details: Cow<'static, str> },
}

impl Error {
    pub(crate) fn field_parse(field: Field, details: impl Into<Cow<'static, str>>) -> Self {
        Self::FieldParse {
            field,
            details: details.into(),
        }
    }

    /// Whether the error only invalidates a single derived field.
    #[must_use]
    pub const fn is_field_local(&self) -> bool {
        matches!(self, Self::FieldParse { .. })
    }
}

/// Logical field of a record, used for diagnostic reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Height,
    Width,
    Soil,
    PopularityRanking,
    /// Dimension parsed outside of a record (operator probes).
    Dimension,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Height => write!(f, "height"),
            Self::Width => write!(f, "width"),
            Self::Soil => write!(f, "soil"),
            Self::PopularityRanking => write!(f, "popularity ranking"),
            Self::Dimension => write!(f, "dimension"),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            details: Cow::Owned(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            details: Cow::Owned(err.to_string()),
        }
    }
}
