//! Value kinds: the validators attached to every property.

use crate::util::is_color;
use serde_json::Value;

/// Predicate a property value must satisfy.
///
/// Kinds validate the JSON form of a value so that typed assignments and
/// dynamic (document) assignments go through the same check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Kind {
    Any,
    Boolean,
    Number,
    /// A number with no fractional part
    Int,
    NonNegative,
    /// A number in the closed interval [0, 1]
    Percent,
    Angle,
    String,
    NullString,
    /// A CSS font size such as `"12px"` or `"1.2em"`
    FontSize,
    Color,
    Array,
    Enum(&'static [&'static str]),
    Nullable(&'static Kind),
    Map,
}

impl Kind {
    pub fn valid(&self, value: &Value) -> bool {
        match self {
            Kind::Any => true,
            Kind::Boolean => value.is_boolean(),
            Kind::Number | Kind::Angle => value.is_number(),
            Kind::Int => value.as_f64().is_some_and(|v| v.fract() == 0.0),
            Kind::NonNegative => value.as_f64().is_some_and(|v| v >= 0.0),
            Kind::Percent => value.as_f64().is_some_and(|v| (0.0..=1.0).contains(&v)),
            Kind::String => value.is_string(),
            Kind::NullString => value.is_null() || value.is_string(),
            Kind::FontSize => value.as_str().is_some_and(is_font_size),
            Kind::Color => is_color(value),
            Kind::Array => value.is_array(),
            Kind::Enum(values) => value.as_str().is_some_and(|s| values.contains(&s)),
            Kind::Nullable(inner) => value.is_null() || inner.valid(value),
            Kind::Map => value.is_object(),
        }
    }
}

fn is_font_size(text: &str) -> bool {
    const UNITS: &[&str] = &["px", "pt", "em", "rem", "%", "vh", "vw"];
    UNITS.iter().any(|unit| {
        text.strip_suffix(unit)
            .is_some_and(|number| number.trim().parse::<f64>().is_ok())
    })
}
