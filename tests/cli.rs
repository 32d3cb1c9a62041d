#![allow(clippy::pedantic)]
use std::fs;
use std::process::Command;

use serde_json::{Value as JsonValue, json};
use tempfile::tempdir;

const EXPORT: &str = "CalScape plant list,,,,\n\
                      Region: Los Angeles County,,,,\n\
                      Generated 2019-05-01,,,,\n\
                      Source: calscape.org,,,,\n\
                      Current Botanical Name,Height,Width,Soil,Popularity Ranking\n\
                      Salvia apiana,3 - 5 ft(0.9 - 1.5 m),5 ft(,Tolerates serpentine,3\n\
                      Ceanothus 'Dark Star',6 ft,often,nan,high\n\
                      Eriogonum fasciculatum,1 - 3 ft(0.3 - 0.9 m),4 ft,Accepts clay. Does best in full sun.,12\n";

fn calscape() -> Command {
    Command::new(env!("CARGO_BIN_EXE_calscape"))
}

#[test]
fn normalize_writes_json_lines_and_reports_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.csv");
    fs::write(&input, EXPORT).unwrap();
    let out_dir = dir.path().join("out");

    let output = calscape()
        .arg("normalize")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.contains("(3 rows: 1 normalized, 1 partial, 1 rejected)"),
        "{stdout}"
    );
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Ceanothus 'Dark Star'"), "{stderr}");
    assert!(
        stderr.contains("Salvia apiana: could not parse width"),
        "{stderr}"
    );

    let written = fs::read_to_string(out_dir.join("export.normalized.jsonl")).unwrap();
    let records: Vec<JsonValue> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Current Botanical Name"], json!("Salvia apiana"));
    assert_eq!(records[0]["Popularity Ranking"], json!(3));
    assert!(records[0].get("Mature Width - max (ft)").is_none());
    assert_eq!(records[1]["Soil - Tolerates"], json!("Accepts clay."));
    assert_eq!(records[1]["Mature Height - max (m)"], json!(0.9));
}

#[test]
fn normalize_writes_csv_to_explicit_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.csv");
    fs::write(&input, EXPORT).unwrap();
    let out = dir.path().join("plants.csv");

    let status = calscape()
        .arg("normalize")
        .arg(&input)
        .args(["--format", "csv", "--out"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let written = fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Current Botanical Name,Height,Width,Soil,Popularity Ranking,"));
    assert!(header.ends_with("Soil - Tolerates,Soil - Prefers"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn fail_fast_exits_with_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.csv");
    fs::write(&input, EXPORT).unwrap();

    let output = calscape()
        .arg("normalize")
        .arg(&input)
        .arg("--fail-fast")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("cannot coerce popularity ranking value \"high\" to an integer"),
        "{stderr}"
    );
}

#[test]
fn parse_dimension_prints_json() {
    let output = calscape()
        .args(["parse-dimension", "36 in(91 cm)", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: JsonValue = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed, json!({ "max_ft": 3.0, "max_m": 0.91 }));
}

#[test]
fn split_soil_prints_clauses() {
    let output = calscape()
        .args(["split-soil", "Tolerates clay. Prefers loam."])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("tolerates: Tolerates clay."), "{stdout}");
    assert!(stdout.contains("prefers:   Prefers loam."), "{stdout}");
}
