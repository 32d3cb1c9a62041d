use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::dimension::ParsedDimension;
use crate::error::Field;
use crate::soil::SoilSplit;
use crate::value::FieldValue;

pub const HEIGHT_KEYS: DimensionKeys = DimensionKeys {
    min_ft: "Mature Height - min (ft)",
    max_ft: "Mature Height - max (ft)",
    min_m: "Mature Height - min (m)",
    max_m: "Mature Height - max (m)",
};

pub const WIDTH_KEYS: DimensionKeys = DimensionKeys {
    min_ft: "Mature Width - min (ft)",
    max_ft: "Mature Width - max (ft)",
    min_m: "Mature Width - min (m)",
    max_m: "Mature Width - max (m)",
};

pub const SOIL_TOLERATES_KEY: &str = "Soil - Tolerates";
pub const SOIL_PREFERS_KEY: &str = "Soil - Prefers";

/// Output column names for the four bounds of one dimension.
#[derive(Debug, Clone, Copy)]
pub struct DimensionKeys {
    pub min_ft: &'static str,
    pub max_ft: &'static str,
    pub min_m: &'static str,
    pub max_m: &'static str,
}

impl DimensionKeys {
    #[must_use]
    pub const fn all(&self) -> [&'static str; 4] {
        [self.min_ft, self.max_ft, self.min_m, self.max_m]
    }

    fn pairs(&self, dimension: &ParsedDimension) -> [(&'static str, Option<f64>); 4] {
        [
            (self.min_ft, dimension.min_ft),
            (self.max_ft, dimension.max_ft),
            (self.min_m, dimension.min_m),
            (self.max_m, dimension.max_m),
        ]
    }
}

/// Every column name the normalizer derives.
#[must_use]
pub fn derived_keys() -> impl Iterator<Item = &'static str> {
    HEIGHT_KEYS
        .all()
        .into_iter()
        .chain(WIDTH_KEYS.all())
        .chain([SOIL_TOLERATES_KEY, SOIL_PREFERS_KEY])
}

/// Insertion-ordered column → value mapping.
///
/// Setting an existing column replaces it in place, so a row keeps the column
/// order of the export it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields<V> {
    entries: Vec<(String, V)>,
}

/// One export row: column name → raw cell text.
pub type Row = Fields<String>;

/// One normalized row: column name → typed value.
pub type FieldMap = Fields<FieldValue>;

impl<V> Default for Fields<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Fields<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find_map(|(name, value)| (name == key).then_some(value))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Fields<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<V> IntoIterator for Fields<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for Fields<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl FieldMap {
    /// Renders every value back to text, e.g. to feed an output row through
    /// the normalizer again.
    #[must_use]
    pub fn to_row(&self) -> Row {
        self.iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect()
    }
}

/// A field-local parse failure kept on the record for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: Field,
    pub raw: String,
    pub reason: String,
}

/// Result of normalizing one row.
///
/// The named fields hold everything the normalizer derived; `passthrough`
/// holds the remaining non-empty export columns in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub name: Option<String>,
    pub height: ParsedDimension,
    pub width: ParsedDimension,
    pub soil: SoilSplit,
    pub popularity_column: String,
    pub popularity_ranking: Option<i64>,
    pub passthrough: Row,
    pub issues: Vec<FieldIssue>,
}

impl NormalizedRecord {
    /// Name used to identify the record in diagnostics.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_RECORD)
    }

    /// Whether any field failed to parse and was omitted.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Builds the output mapping handed to the record store.
    ///
    /// Derived columns replace same-named input columns in place; derived
    /// columns with no value are removed rather than left empty.
    #[must_use]
    pub fn to_fields(&self) -> FieldMap {
        let mut fields: FieldMap = self
            .passthrough
            .iter()
            .map(|(key, value)| (key, FieldValue::from(value.as_str())))
            .collect();

        match self.popularity_ranking {
            Some(rank) => fields.insert(self.popularity_column.as_str(), FieldValue::Int(rank)),
            None => {
                fields.remove(&self.popularity_column);
            }
        }

        for (keys, dimension) in [(HEIGHT_KEYS, &self.height), (WIDTH_KEYS, &self.width)] {
            for (key, value) in keys.pairs(dimension) {
                set_or_remove(&mut fields, key, value.map(FieldValue::Float));
            }
        }

        set_or_remove(
            &mut fields,
            SOIL_TOLERATES_KEY,
            self.soil.tolerates.clone().map(FieldValue::Text),
        );
        set_or_remove(
            &mut fields,
            SOIL_PREFERS_KEY,
            self.soil.prefers.clone().map(FieldValue::Text),
        );

        fields
    }

    #[must_use]
    pub fn into_fields(self) -> FieldMap {
        self.to_fields()
    }
}

pub(crate) const UNNAMED_RECORD: &str = "<unnamed record>";

fn set_or_remove(fields: &mut FieldMap, key: &str, value: Option<FieldValue>) {
    match value {
        Some(value) => fields.insert(key, value),
        None => {
            fields.remove(key);
        }
    }
}
