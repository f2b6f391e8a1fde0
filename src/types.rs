//! Core enumerations shared by properties, visuals and glyphs.
//!
//! Every enum serializes to the lowercase/snake_case names used in plot
//! documents, so a JSON literal such as `"bevel"` or `"deg"` deserializes
//! straight into the typed value.

use serde::{Deserialize, Serialize};

// ============================================================================
// Line Styles
// ============================================================================

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Miter,
    Round,
    #[default]
    Bevel,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// A dash pattern, stored as alternating on/off lengths in pixels.
///
/// Accepts a named pattern (`"dashed"`), a space separated string of
/// integers (`"4 4"`) or an array of numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "Vec<f64>")]
pub struct LineDash(pub Vec<f64>);

impl LineDash {
    pub fn solid() -> Self {
        Self(Vec::new())
    }

    /// Look up one of the named dash patterns
    pub fn named(name: &str) -> Option<Self> {
        let pattern: &[f64] = match name {
            "solid" => &[],
            "dashed" => &[6.0],
            "dotted" => &[2.0, 4.0],
            "dotdash" => &[2.0, 4.0, 6.0, 4.0],
            "dashdot" => &[6.0, 4.0, 2.0, 4.0],
            _ => return None,
        };
        Some(Self(pattern.to_vec()))
    }

    pub fn is_solid(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<serde_json::Value> for LineDash {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match &value {
            serde_json::Value::String(s) => {
                if let Some(dash) = LineDash::named(s) {
                    return Ok(dash);
                }
                s.split_whitespace()
                    .map(|part| part.parse::<u32>().map(f64::from))
                    .collect::<Result<Vec<_>, _>>()
                    .map(LineDash)
                    .map_err(|_| format!("invalid dash pattern: {s}"))
            }
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_f64().ok_or_else(|| format!("invalid dash length: {item}")))
                .collect::<Result<Vec<_>, _>>()
                .map(LineDash),
            other => Err(format!("invalid dash pattern: {other}")),
        }
    }
}

impl From<LineDash> for Vec<f64> {
    fn from(dash: LineDash) -> Self {
        dash.0
    }
}

// ============================================================================
// Text Styles
// ============================================================================

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Bottom,
    Alphabetic,
    Hanging,
    Ideographic,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "bold italic")]
    BoldItalic,
}

impl FontStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Bold => "bold",
            FontStyle::BoldItalic => "bold italic",
        }
    }
}

// ============================================================================
// Units and Dimensions
// ============================================================================

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnits {
    Deg,
    #[default]
    Rad,
    Grad,
    Turn,
}

impl AngleUnits {
    pub const ALL: &'static [AngleUnits] = &[
        AngleUnits::Deg,
        AngleUnits::Rad,
        AngleUnits::Grad,
        AngleUnits::Turn,
    ];

    /// Multiplier converting a value in these units to radians
    pub fn to_radians_coeff(&self) -> f64 {
        match self {
            AngleUnits::Deg => std::f64::consts::PI / 180.0,
            AngleUnits::Rad => 1.0,
            AngleUnits::Grad => std::f64::consts::PI / 200.0,
            AngleUnits::Turn => 2.0 * std::f64::consts::PI,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialUnits {
    Screen,
    #[default]
    Data,
}

impl SpatialUnits {
    pub const ALL: &'static [SpatialUnits] = &[SpatialUnits::Screen, SpatialUnits::Data];
}

/// Coordinate axis a coordinate property projects through
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

/// Orientation of span-like annotations (whiskers, span hit tests)
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    #[default]
    Height,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureRepetition {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

impl TextureRepetition {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextureRepetition::Repeat => "repeat",
            TextureRepetition::RepeatX => "repeat-x",
            TextureRepetition::RepeatY => "repeat-y",
            TextureRepetition::NoRepeat => "no-repeat",
        }
    }
}

// ============================================================================
// Markers
// ============================================================================

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    Asterisk,
    #[default]
    Circle,
    CircleCross,
    CircleX,
    Cross,
    Dash,
    Diamond,
    Dot,
    InvertedTriangle,
    Square,
    SquareX,
    Triangle,
    X,
}
