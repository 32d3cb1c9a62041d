use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_NAME_COLUMN: &str = "Current Botanical Name";
pub const DEFAULT_HEIGHT_COLUMN: &str = "Height";
pub const DEFAULT_WIDTH_COLUMN: &str = "Width";
pub const DEFAULT_SOIL_COLUMN: &str = "Soil";
pub const DEFAULT_POPULARITY_COLUMN: &str = "Popularity Ranking";
/// Textual placeholder the spreadsheet export writes for empty cells.
pub const DEFAULT_MISSING_PLACEHOLDER: &str = "nan";
/// Rows of title/notes that precede the header in a CalScape export.
pub const CALSCAPE_PREAMBLE_ROWS: usize = 4;

/// Column names and placeholder handling used by [`crate::Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeOptions {
    name_column: String,
    height_column: String,
    width_column: String,
    soil_column: String,
    popularity_column: String,
    missing_placeholders: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name_column: DEFAULT_NAME_COLUMN.to_owned(),
            height_column: DEFAULT_HEIGHT_COLUMN.to_owned(),
            width_column: DEFAULT_WIDTH_COLUMN.to_owned(),
            soil_column: DEFAULT_SOIL_COLUMN.to_owned(),
            popularity_column: DEFAULT_POPULARITY_COLUMN.to_owned(),
            missing_placeholders: vec![DEFAULT_MISSING_PLACEHOLDER.to_owned()],
        }
    }

    /// Loads options from a JSON file; omitted keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid options
    /// object.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text).map_err(|err| Error::Config {
            details: format!("{}: {err}", path.display()).into(),
        })?;
        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_name_column(mut self, column: impl Into<String>) -> Self {
        self.name_column = column.into();
        self
    }

    #[must_use]
    pub fn with_height_column(mut self, column: impl Into<String>) -> Self {
        self.height_column = column.into();
        self
    }

    #[must_use]
    pub fn with_width_column(mut self, column: impl Into<String>) -> Self {
        self.width_column = column.into();
        self
    }

    #[must_use]
    pub fn with_soil_column(mut self, column: impl Into<String>) -> Self {
        self.soil_column = column.into();
        self
    }

    #[must_use]
    pub fn with_popularity_column(mut self, column: impl Into<String>) -> Self {
        self.popularity_column = column.into();
        self
    }

    #[must_use]
    pub fn with_missing_placeholders<I, S>(mut self, placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = placeholders.into_iter().map(Into::into).collect();
        collected.retain(|placeholder| !placeholder.trim().is_empty());
        self.missing_placeholders = collected;
        self
    }

    /// Checks that no two roles share a column name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on empty or duplicated column names.
    pub fn validate(&self) -> Result<()> {
        let columns = [
            ("name", &self.name_column),
            ("height", &self.height_column),
            ("width", &self.width_column),
            ("soil", &self.soil_column),
            ("popularity", &self.popularity_column),
        ];
        for (index, (role, column)) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(Error::Config {
                    details: format!("{role} column name is empty").into(),
                });
            }
            if let Some((other, _)) = columns[..index].iter().find(|(_, c)| c == column) {
                return Err(Error::Config {
                    details: format!("{role} and {other} columns are both '{column}'").into(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    #[must_use]
    pub fn height_column(&self) -> &str {
        &self.height_column
    }

    #[must_use]
    pub fn width_column(&self) -> &str {
        &self.width_column
    }

    #[must_use]
    pub fn soil_column(&self) -> &str {
        &self.soil_column
    }

    #[must_use]
    pub fn popularity_column(&self) -> &str {
        &self.popularity_column
    }

    /// Whether `value` stands for an empty cell.
    #[must_use]
    pub fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || self
                .missing_placeholders
                .iter()
                .any(|placeholder| placeholder.eq_ignore_ascii_case(trimmed))
    }
}

/// Layout of a delimited export handed to [`crate::source::read_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    skip_rows: usize,
    delimiter: u8,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skip_rows: 0,
            delimiter: b',',
        }
    }

    /// Number of preamble lines to drop before the header row.
    #[must_use]
    pub const fn with_skip_rows(mut self, count: usize) -> Self {
        self.skip_rows = count;
        self
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn skip_rows(&self) -> usize {
        self.skip_rows
    }

    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_cover_placeholder_and_blank() {
        let options = NormalizeOptions::new();
        assert!(options.is_missing("nan"));
        assert!(options.is_missing("NaN"));
        assert!(options.is_missing("   "));
        assert!(!options.is_missing("nana"));
        assert!(!options.is_missing("0"));
    }

    #[test]
    fn custom_placeholders_replace_defaults() {
        let options = NormalizeOptions::new().with_missing_placeholders(["N/A", " "]);
        assert!(options.is_missing("n/a"));
        assert!(!options.is_missing("nan"));
        assert!(options.is_missing(""));
    }

    #[test]
    fn json_config_overrides_selected_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "name_column": "Botanical Name" }"#).unwrap();

        let options = NormalizeOptions::from_json_file(&path).unwrap();
        assert_eq!(options.name_column(), "Botanical Name");
        assert_eq!(options.height_column(), DEFAULT_HEIGHT_COLUMN);
    }

    #[test]
    fn json_config_rejects_unknown_and_duplicate_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");

        std::fs::write(&path, r#"{ "hieght_column": "Height" }"#).unwrap();
        assert!(matches!(
            NormalizeOptions::from_json_file(&path),
            Err(Error::Config { .. })
        ));

        std::fs::write(&path, r#"{ "width_column": "Height" }"#).unwrap();
        assert!(matches!(
            NormalizeOptions::from_json_file(&path),
            Err(Error::Config { .. })
        ));
    }
}
