//! Attribute-set descriptors for visual groups.
//!
//! Each group is declared as a static table of `(name, kind)` entries plus a
//! typed defaults struct. An [`AttrSet`] binds a table to a name prefix and
//! builds the concrete properties; owners adjust defaults with struct update
//! syntax, e.g. `LineDefaults { alpha: 0.3, ..Default::default() }`.

use crate::core::{Kind, Property, PropertyValue};
use crate::settings::settings;
use crate::types::{FontStyle, LineCap, LineDash, LineJoin, TextAlign, TextBaseline};
use crate::util::Color;
use crate::visuals::HatchExtra;

/// One attribute of a visual group
#[derive(Clone, Copy, Debug)]
pub struct AttrDescriptor {
    pub name: &'static str,
    pub kind: Kind,
}

const fn attr(name: &'static str, kind: Kind) -> AttrDescriptor {
    AttrDescriptor { name, kind }
}

const LINE_JOINS: &[&str] = &["miter", "round", "bevel"];
const LINE_CAPS: &[&str] = &["butt", "round", "square"];
const FONT_STYLES: &[&str] = &["normal", "italic", "bold", "bold italic"];
const TEXT_ALIGNS: &[&str] = &["left", "right", "center"];
const TEXT_BASELINES: &[&str] = &["top", "middle", "bottom", "alphabetic", "hanging", "ideographic"];

// ============================================================================
// Attribute Tables
// ============================================================================

pub const LINE: &[AttrDescriptor] = &[
    attr("line_color", Kind::Nullable(&Kind::Color)),
    attr("line_alpha", Kind::Percent),
    attr("line_width", Kind::NonNegative),
    attr("line_join", Kind::Enum(LINE_JOINS)),
    attr("line_cap", Kind::Enum(LINE_CAPS)),
    attr("line_dash", Kind::Any),
    attr("line_dash_offset", Kind::Int),
];

pub const FILL: &[AttrDescriptor] = &[
    attr("fill_color", Kind::Nullable(&Kind::Color)),
    attr("fill_alpha", Kind::Percent),
];

pub const HATCH: &[AttrDescriptor] = &[
    attr("hatch_color", Kind::Nullable(&Kind::Color)),
    attr("hatch_alpha", Kind::Percent),
    attr("hatch_scale", Kind::NonNegative),
    attr("hatch_pattern", Kind::NullString),
    attr("hatch_weight", Kind::NonNegative),
    attr("hatch_extra", Kind::Map),
];

pub const TEXT: &[AttrDescriptor] = &[
    attr("text_color", Kind::Nullable(&Kind::Color)),
    attr("text_alpha", Kind::Percent),
    attr("text_font", Kind::String),
    attr("text_font_size", Kind::FontSize),
    attr("text_font_style", Kind::Enum(FONT_STYLES)),
    attr("text_align", Kind::Enum(TEXT_ALIGNS)),
    attr("text_baseline", Kind::Enum(TEXT_BASELINES)),
    attr("text_line_height", Kind::NonNegative),
];

// ============================================================================
// Typed Defaults
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct LineDefaults {
    pub color: Option<Color>,
    pub alpha: f64,
    pub width: f64,
    pub join: LineJoin,
    pub cap: LineCap,
    pub dash: LineDash,
    pub dash_offset: f64,
}

impl Default for LineDefaults {
    fn default() -> Self {
        Self {
            color: Some(Color::css("black")),
            alpha: 1.0,
            width: 1.0,
            join: LineJoin::Bevel,
            cap: LineCap::Butt,
            dash: LineDash::solid(),
            dash_offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FillDefaults {
    pub color: Option<Color>,
    pub alpha: f64,
}

impl Default for FillDefaults {
    fn default() -> Self {
        Self {
            color: Some(Color::css("gray")),
            alpha: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HatchDefaults {
    pub color: Option<Color>,
    pub alpha: f64,
    pub scale: f64,
    pub pattern: Option<String>,
    pub weight: f64,
    pub extra: HatchExtra,
}

impl Default for HatchDefaults {
    /// Scale comes from the global settings
    fn default() -> Self {
        Self {
            color: Some(Color::css("black")),
            alpha: 1.0,
            scale: settings().hatch_scale,
            pattern: None,
            weight: 1.0,
            extra: HatchExtra::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextDefaults {
    pub color: Option<Color>,
    pub alpha: f64,
    pub font: String,
    pub font_size: String,
    pub font_style: FontStyle,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub line_height: f64,
}

impl Default for TextDefaults {
    /// Font family comes from the global settings
    fn default() -> Self {
        Self {
            color: Some(Color::css("#444444")),
            alpha: 1.0,
            font: settings().text_font().to_string(),
            font_size: "16px".to_string(),
            font_style: FontStyle::Normal,
            align: TextAlign::Left,
            baseline: TextBaseline::Bottom,
            line_height: 1.2,
        }
    }
}

/// A descriptor table bound to a name prefix.
#[derive(Clone, Debug)]
pub struct AttrSet {
    descriptors: &'static [AttrDescriptor],
    prefix: String,
}

impl AttrSet {
    pub fn new(descriptors: &'static [AttrDescriptor]) -> Self {
        Self {
            descriptors,
            prefix: String::new(),
        }
    }

    /// Prefix every attribute name, e.g. `border_` + `line_color`
    pub fn prefixed(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full attribute names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|d| format!("{}{}", self.prefix, d.name))
            .collect()
    }

    /// Declared kind of one (unprefixed) attribute
    pub fn kind(&self, name: &str) -> Option<Kind> {
        self.descriptors.iter().find(|d| d.name == name).map(|d| d.kind)
    }

    /// Build the property for one attribute of the set
    pub fn build<T: PropertyValue>(&self, owner: &'static str, name: &str, default: T) -> Property<T> {
        let kind = self.kind(name).unwrap_or(Kind::Any);
        Property::new(owner, format!("{}{}", self.prefix, name), kind, default)
    }
}
