use std::fmt;

use serde::Serialize;

/// A single output cell produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text carried over from the export (or a derived soil clause).
    Text(String),
    /// Derived measurement in feet or meters.
    Float(f64),
    /// Integer coerced from a textual cell.
    Int(i64),
}

impl FieldValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Float(_) | Self::Int(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Float(v) => write!(f, "{}", ryu::Buffer::new().format(*v)),
            Self::Int(v) => write!(f, "{}", itoa::Buffer::new().format(*v)),
        }
    }
}
