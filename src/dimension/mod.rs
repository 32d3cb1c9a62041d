//! Parsing of free-text mature height/width strings.
//!
//! The export writes dimensions in a handful of shapes:
//!
//! * `3 ft` or `3 - 6 ft` (feet only)
//! * `3 - 6 ft(0.9 - 1.8 m)` and `3 - 6 ft (0.9 - 1.8 m)`
//! * `6 - 12 in(15 - 30 cm)` and `12 in (30 cm)`
//!
//! Ranges use `" - "` or a bare `"-"`. A single value fills only the `max_*`
//! side. Anything else yields [`ParsedDimension::EMPTY`] when parsed leniently.

use std::borrow::Cow;

use serde::Serialize;
use smallvec::SmallVec;

use crate::error::{Error, Field, Result};
use crate::logger::log_warn;
use crate::units::LengthUnit;

#[cfg(test)]
mod tests;

/// Min/max bounds of one dimension in feet and meters.
///
/// Bounds keep the order they were written in; a source whose first value is
/// larger than the second is not re-sorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParsedDimension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_m: Option<f64>,
}

impl ParsedDimension {
    pub const EMPTY: Self = Self {
        min_ft: None,
        max_ft: None,
        min_m: None,
        max_m: None,
    };

    /// Parses `raw`, returning the empty dimension (and logging a warning) if
    /// it does not match a known shape.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match parse_dimension(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                log_warn(&err.to_string());
                Self::EMPTY
            }
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min_ft.is_none() && self.max_ft.is_none() && self.min_m.is_none() && self.max_m.is_none()
    }

    #[must_use]
    pub const fn has_metric(&self) -> bool {
        self.max_m.is_some()
    }
}

/// Parses a dimension string outside of any record context.
///
/// # Errors
///
/// Returns [`Error::FieldParse`] when the text is not one of the recognised
/// dimension shapes.
pub fn parse_dimension(raw: &str) -> Result<ParsedDimension> {
    parse_dimension_field(raw, Field::Dimension)
}

pub(crate) fn parse_dimension_field(raw: &str, field: Field) -> Result<ParsedDimension> {
    let layout = Layout::detect(raw, field)?;

    let (min_ft, max_ft) = parse_range(layout.imperial, layout.imperial_unit, raw, field)?;
    let mut parsed = ParsedDimension {
        min_ft,
        max_ft: Some(max_ft),
        ..ParsedDimension::EMPTY
    };

    if let Some(metric) = layout.metric {
        let (segment, unit) = metric_segment(metric, layout.metric_unit, raw, field)?;
        let (min_m, max_m) = parse_range(segment, unit, raw, field)?;
        parsed.min_m = min_m;
        parsed.max_m = Some(max_m);
    }

    Ok(parsed)
}

/// Where the imperial and metric halves of a dimension string live.
struct Layout<'a> {
    imperial: &'a str,
    imperial_unit: LengthUnit,
    metric: Option<&'a str>,
    metric_unit: LengthUnit,
}

impl<'a> Layout<'a> {
    /// Besides the feet, feet+meters and inches+centimeters shapes, a bare
    /// inch value (`"12 in"`) is also accepted and fills the feet side only.
    fn detect(raw: &'a str, field: Field) -> Result<Self> {
        if let Some((imperial, metric)) = raw.split_once("ft(").or_else(|| raw.split_once("ft (")) {
            return Ok(Self::paired(imperial, LengthUnit::Feet, metric, LengthUnit::Meters));
        }

        if raw.contains("in") || raw.contains("cm") {
            if let Some((imperial, metric)) = raw.split_once("in(").or_else(|| raw.split_once("in (")) {
                return Ok(Self::paired(
                    imperial,
                    LengthUnit::Inches,
                    metric,
                    LengthUnit::Centimeters,
                ));
            }
            if raw.trim_end().ends_with(LengthUnit::Inches.suffix()) {
                return Ok(Self::imperial_only(raw, LengthUnit::Inches));
            }
            return Err(Error::field_parse(
                field,
                format!("{raw:?}: inch/centimeter value without an `in(` marker"),
            ));
        }

        Ok(Self::imperial_only(raw, LengthUnit::Feet))
    }

    const fn paired(
        imperial: &'a str,
        imperial_unit: LengthUnit,
        metric: &'a str,
        metric_unit: LengthUnit,
    ) -> Self {
        Self {
            imperial,
            imperial_unit,
            metric: Some(metric),
            metric_unit,
        }
    }

    const fn imperial_only(imperial: &'a str, imperial_unit: LengthUnit) -> Self {
        Self {
            imperial,
            imperial_unit,
            metric: None,
            metric_unit: LengthUnit::Meters,
        }
    }
}

/// Extracts the text inside the metric parenthetical and resolves its unit.
fn metric_segment<'a>(
    metric: &'a str,
    default_unit: LengthUnit,
    raw: &str,
    field: Field,
) -> Result<(&'a str, LengthUnit)> {
    let Some(inner) = metric.trim_end().strip_suffix(')') else {
        return Err(Error::field_parse(
            field,
            format!("{raw:?}: missing closing parenthesis"),
        ));
    };
    let inner = inner.trim_end_matches(')').trim_end();
    let unit = if inner.ends_with(LengthUnit::Centimeters.suffix()) {
        LengthUnit::Centimeters
    } else if inner.ends_with(LengthUnit::Meters.suffix()) {
        LengthUnit::Meters
    } else {
        default_unit
    };
    Ok((inner, unit))
}

/// Parses `a - b`, `a-b` or `v` into `(min, max)` expressed in the base unit.
fn parse_range(
    segment: &str,
    unit: LengthUnit,
    raw: &str,
    field: Field,
) -> Result<(Option<f64>, f64)> {
    let text = unit.strip_suffix(segment).trim();
    if text.is_empty() {
        return Err(Error::field_parse(field, format!("{raw:?}: empty segment")));
    }

    let bounds: SmallVec<[&str; 2]> = if text.contains(" - ") {
        text.split(" - ").collect()
    } else {
        text.split('-').collect()
    };

    match bounds.as_slice() {
        [value] => Ok((None, parse_bound(value, unit, raw, field)?)),
        [min, max] => Ok((
            Some(parse_bound(min, unit, raw, field)?),
            parse_bound(max, unit, raw, field)?,
        )),
        _ => Err(Error::field_parse(
            field,
            format!("{raw:?}: expected at most two range bounds, found {}", bounds.len()),
        )),
    }
}

fn parse_bound(text: &str, unit: LengthUnit, raw: &str, field: Field) -> Result<f64> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(unit.to_base(value)),
        _ => Err(Error::field_parse(field, invalid_number(raw, text))),
    }
}

fn invalid_number(raw: &str, text: &str) -> Cow<'static, str> {
    if text.is_empty() {
        Cow::Owned(format!("{raw:?}: missing number in range"))
    } else {
        Cow::Owned(format!("{raw:?}: {text:?} is not a number"))
    }
}
