#![allow(clippy::pedantic)]
use std::fs;
use std::path::Path;

use calscape_normalize::source::read_rows_from_path;
use calscape_normalize::{Normalizer, SourceOptions};
use datatest_stable::Result;
use serde_json::Value as JsonValue;

mod common;
use common::{absolute_path, outcome_to_json};

fn verify_fixture(path: &Path) -> Result<()> {
    let absolute = absolute_path(path);
    let rows = read_rows_from_path(&absolute, &SourceOptions::new())?;
    let normalizer = Normalizer::default();
    let actual = JsonValue::Array(
        rows.rows()
            .iter()
            .map(|row| outcome_to_json(&normalizer, row))
            .collect(),
    );

    let expected_path = absolute.with_extension("expected.json");
    let expected: JsonValue = serde_json::from_str(&fs::read_to_string(&expected_path)?)?;
    assert_eq!(
        actual,
        expected,
        "golden mismatch for {}; actual:\n{}",
        path.display(),
        serde_json::to_string_pretty(&actual)?
    );
    Ok(())
}

datatest_stable::harness! {{
    test = verify_fixture,
    root = "tests/fixtures/golden",
    pattern = r"(?i)^.*\.csv$"
}}
