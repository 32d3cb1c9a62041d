use super::{ParsedDimension, parse_dimension, parse_dimension_field};
use crate::error::{Error, Field};

fn dim(min_ft: Option<f64>, max_ft: f64, min_m: Option<f64>, max_m: Option<f64>) -> ParsedDimension {
    ParsedDimension {
        min_ft,
        max_ft: Some(max_ft),
        min_m,
        max_m,
    }
}

#[test]
fn feet_and_meter_ranges_are_taken_verbatim() {
    let parsed = parse_dimension("3 - 6 ft(0.9 - 1.8 m)").unwrap();
    assert_eq!(parsed, dim(Some(3.0), 6.0, Some(0.9), Some(1.8)));

    let spaced = parse_dimension("3 - 6 ft (0.9 - 1.8 m)").unwrap();
    assert_eq!(spaced, parsed);
}

#[test]
fn bare_hyphen_ranges_parse_like_spaced_ones() {
    let parsed = parse_dimension("1-3 ft(0.3-0.9 m)").unwrap();
    assert_eq!(parsed, dim(Some(1.0), 3.0, Some(0.3), Some(0.9)));
}

#[test]
fn single_feet_value_has_no_min_and_no_metric() {
    let parsed = parse_dimension("4 ft").unwrap();
    assert_eq!(parsed, dim(None, 4.0, None, None));
    assert!(!parsed.has_metric());
}

#[test]
fn single_value_with_metric_fills_max_only() {
    let parsed = parse_dimension("10 ft(3 m)").unwrap();
    assert_eq!(parsed, dim(None, 10.0, None, Some(3.0)));
}

#[test]
fn inches_and_centimeters_are_converted() {
    let parsed = parse_dimension("36 in(91 cm)").unwrap();
    assert_eq!(parsed.min_ft, None);
    assert_eq!(parsed.max_ft, Some(3.0));
    assert_eq!(parsed.min_m, None);
    assert_eq!(parsed.max_m, Some(0.91));

    let range = parse_dimension("6 - 18 in (15 - 45 cm)").unwrap();
    assert_eq!(range, dim(Some(0.5), 1.5, Some(0.15), Some(0.45)));
}

#[test]
fn inches_without_metric_convert_to_feet_only() {
    let parsed = parse_dimension("12 in").unwrap();
    assert_eq!(parsed, dim(None, 1.0, None, None));
}

#[test]
fn descending_ranges_keep_source_order() {
    let parsed = parse_dimension("6 - 3 ft").unwrap();
    assert_eq!(parsed, dim(Some(6.0), 3.0, None, None));
}

#[test]
fn malformed_strings_fail_with_field_parse() {
    for raw in ["unknown", "", "5 ft(", "5 ft(1.5 m", "a - b ft", "1 - 2 - 3 ft", "30 cm", "- 3 ft"] {
        let err = parse_dimension(raw).unwrap_err();
        assert!(err.is_field_local(), "{raw:?} should fail locally, got {err}");
    }
}

#[test]
fn non_finite_numbers_are_rejected() {
    assert!(parse_dimension("inf ft").is_err());
    assert!(parse_dimension("NaN ft(1 m)").is_err());
}

#[test]
fn lenient_parse_returns_empty_dimension() {
    let parsed = ParsedDimension::parse("5 ft(");
    assert!(parsed.is_empty());
    assert_eq!(parsed, ParsedDimension::EMPTY);

    let parsed = ParsedDimension::parse("2 - 4 ft(0.6 - 1.2 m)");
    assert_eq!(parsed, dim(Some(2.0), 4.0, Some(0.6), Some(1.2)));
}

#[test]
fn errors_name_the_field_and_raw_text() {
    let err = parse_dimension_field("5 ft(", Field::Width).unwrap_err();
    match &err {
        Error::FieldParse { field, details } => {
            assert_eq!(*field, Field::Width);
            assert!(details.contains("\"5 ft(\""), "details: {details}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().starts_with("could not parse width"));
}
