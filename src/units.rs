//! Length unit conversions used by the dimension parser.

const INCHES_PER_FOOT: f64 = 12.0;
const CENTIMETERS_PER_METER: f64 = 100.0;

#[must_use]
pub fn inches_to_feet(inches: f64) -> f64 {
    inches / INCHES_PER_FOOT
}

#[must_use]
pub fn centimeters_to_meters(centimeters: f64) -> f64 {
    centimeters / CENTIMETERS_PER_METER
}

/// Unit suffix found on one side of a dimension string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Feet,
    Inches,
    Meters,
    Centimeters,
}

impl LengthUnit {
    /// Literal suffix written by the export.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Feet => "ft",
            Self::Inches => "in",
            Self::Meters => "m",
            Self::Centimeters => "cm",
        }
    }

    /// Converts `value` to the base unit of its system (feet or meters).
    #[must_use]
    pub fn to_base(self, value: f64) -> f64 {
        match self {
            Self::Feet | Self::Meters => value,
            Self::Inches => inches_to_feet(value),
            Self::Centimeters => centimeters_to_meters(value),
        }
    }

    /// Strips this unit's suffix from the end of `text`, if present.
    #[must_use]
    pub fn strip_suffix(self, text: &str) -> &str {
        let trimmed = text.trim_end();
        trimmed
            .strip_suffix(self.suffix())
            .map_or(trimmed, str::trim_end)
    }
}
