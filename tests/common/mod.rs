#![allow(dead_code)]
use std::path::{Path, PathBuf};

use calscape_normalize::{Normalizer, Row};
use serde_json::{Value as JsonValue, json};

pub fn row(cells: &[(&str, &str)]) -> Row {
    cells
        .iter()
        .map(|(key, value)| (*key, (*value).to_owned()))
        .collect()
}

/// Outcome of one row as compared against golden files: either the output
/// fields plus field-local issues, or the rejection message.
pub fn outcome_to_json(normalizer: &Normalizer, row: &Row) -> JsonValue {
    match normalizer.normalize(row) {
        Ok(record) => json!({
            "fields": record.to_fields(),
            "issues": record.issues,
        }),
        Err(err) => json!({ "rejected": err.to_string() }),
    }
}

pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
    }
}
